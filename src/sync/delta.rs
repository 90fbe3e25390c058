//! Delta classification between two versions of a file
//!
//! Re-chunks the updated file and splits its chunks into those whose content
//! already exists in the original (reused) and those that do not (changed).

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, Chunker, ChunkerConfig};
use crate::metrics::DiffTimer;
use crate::sync::error::{DiffError, DiffResult, Side};
use crate::sync::rolling_hash::WeightTable;
use crate::sync::signature::SignatureIndex;

/// Classification of an updated file's chunks against an original signature.
///
/// `reused` holds the ORIGINAL file's chunk for each matching digest, so a
/// patch step can copy those bytes from the original. `changed` holds the
/// updated file's own chunks. Both are in digest (unspecified) order; use
/// [`Delta::sort_by_offset`] when file order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub reused: Vec<Chunk>,
    pub changed: Vec<Chunk>,
}

impl Delta {
    /// True when the updated file has no content missing from the original
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn sort_by_offset(&mut self) {
        self.reused.sort_by_key(|c| c.offset);
        self.changed.sort_by_key(|c| c.offset);
    }

    pub fn stats(&self) -> DeltaStats {
        DeltaStats {
            reused_chunks: self.reused.len(),
            changed_chunks: self.changed.len(),
            reused_bytes: self.reused.iter().map(|c| c.length as u64).sum(),
            changed_bytes: self.changed.iter().map(|c| c.length as u64).sum(),
        }
    }
}

/// Statistics about a delta
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaStats {
    pub reused_chunks: usize,
    pub changed_chunks: usize,
    pub reused_bytes: u64,
    pub changed_bytes: u64,
}

impl DeltaStats {
    /// Percentage of classified bytes that can be copied from the original
    pub fn reuse_percent(&self) -> f64 {
        let total = self.reused_bytes + self.changed_bytes;
        if total == 0 {
            return 0.0;
        }
        self.reused_bytes as f64 / total as f64 * 100.0
    }
}

impl std::fmt::Display for DeltaStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Delta: {} reused ({} bytes, {:.1}%), {} changed ({} bytes)",
            self.reused_chunks,
            self.reused_bytes,
            self.reuse_percent(),
            self.changed_chunks,
            self.changed_bytes
        )
    }
}

/// Computes deltas with one fixed chunking configuration.
///
/// The original signature must have been built with the same chunk size,
/// window and weight table; mismatched parameters produce a meaningless
/// (but not erroneous) delta.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    chunker: Chunker,
}

impl DiffEngine {
    pub fn new(config: ChunkerConfig) -> DiffResult<Self> {
        Ok(Self::with_chunker(Chunker::new(config)?))
    }

    /// Engine sharing an existing weight table
    pub fn with_table(config: ChunkerConfig, table: Arc<WeightTable>) -> DiffResult<Self> {
        Ok(Self::with_chunker(Chunker::with_table(config, table)?))
    }

    pub fn with_chunker(chunker: Chunker) -> Self {
        Self { chunker }
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Signature of an in-memory file
    pub fn signature(&self, data: Bytes) -> SignatureIndex {
        SignatureIndex::build(self.chunker.chunk(data))
    }

    /// Classify the chunks of `updated` against `original`
    pub fn diff(&self, original: &SignatureIndex, updated: Bytes) -> Delta {
        let timer = DiffTimer::start();
        let updated = self.signature(updated);
        self.finish(timer, original, updated)
    }

    /// Chunk both buffers and classify
    pub fn diff_bytes(&self, original: Bytes, updated: Bytes) -> Delta {
        let original = self.signature(original);
        self.diff(&original, updated)
    }

    /// Stream both sources through the chunker and classify.
    ///
    /// The original is read to completion first. Any read failure aborts the
    /// whole comparison.
    pub fn diff_reader<A: Read, B: Read>(&self, original: A, updated: B) -> DiffResult<Delta> {
        let original = SignatureIndex::from_reader(&self.chunker, original)
            .map_err(|e| DiffError::io(Side::Original, e))?;

        let timer = DiffTimer::start();
        let updated = SignatureIndex::from_reader(&self.chunker, updated)
            .map_err(|e| DiffError::io(Side::Updated, e))?;

        Ok(self.finish(timer, &original, updated))
    }

    fn finish(
        &self,
        timer: DiffTimer,
        original: &SignatureIndex,
        updated: SignatureIndex,
    ) -> Delta {
        let delta = classify(original, updated);
        let stats = delta.stats();
        let elapsed_ms = timer.finish(&stats).as_millis() as u64;

        tracing::info!(
            reused = stats.reused_chunks,
            changed = stats.changed_chunks,
            reused_bytes = stats.reused_bytes,
            changed_bytes = stats.changed_bytes,
            elapsed_ms,
            chunk_size = self.chunker.config().chunk_size,
            "Computed delta"
        );

        delta
    }
}

/// Probe `original` with every entry of `updated`
pub fn classify(original: &SignatureIndex, updated: SignatureIndex) -> Delta {
    let mut delta = Delta::default();

    for chunk in updated.into_chunks() {
        match original.lookup(&chunk.digest) {
            Some(existing) => delta.reused.push(existing.clone()),
            None => delta.changed.push(chunk),
        }
    }

    delta
}
