//! Digest-keyed chunk index of one file
//!
//! The lookup side of a diff: every chunk of the original file, addressed by
//! its BLAKE3 digest.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Read;

use crate::chunk::{Chunk, ChunkDigest, Chunker};

/// Signature of one file: digest -> chunk.
///
/// Within-file dedup: chunks are inserted in scan order and the first
/// occurrence of a digest wins; later chunks with the same content are
/// discarded and only counted. Offsets of repeated content are therefore
/// not all represented. There is deliberately no multi-value variant.
#[derive(Debug, Clone, Default)]
pub struct SignatureIndex {
    chunks: HashMap<ChunkDigest, Chunk>,
    duplicates: usize,
}

impl SignatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from one chunking pass, in scan order
    pub fn build(chunks: impl IntoIterator<Item = Chunk>) -> Self {
        let mut index = Self::new();
        for chunk in chunks {
            index.insert(chunk);
        }
        index
    }

    /// Build by streaming `reader` through `chunker`
    pub fn from_reader<R: Read>(chunker: &Chunker, reader: R) -> std::io::Result<Self> {
        let mut index = Self::new();
        let mut bytes = 0usize;
        let mut count = 0usize;

        for chunk in chunker.stream(reader) {
            let chunk = chunk?;
            bytes += chunk.length;
            count += 1;
            index.insert(chunk);
        }

        crate::metrics::record_chunking_pass(bytes, count);
        tracing::debug!(bytes, chunks = count, "Chunked stream");

        Ok(index)
    }

    /// Insert a chunk; returns false if its digest was already present
    pub fn insert(&mut self, chunk: Chunk) -> bool {
        match self.chunks.entry(chunk.digest) {
            Entry::Occupied(_) => {
                self.duplicates += 1;
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(chunk);
                true
            }
        }
    }

    pub fn lookup(&self, digest: &ChunkDigest) -> Option<&Chunk> {
        self.chunks.get(digest)
    }

    pub fn contains(&self, digest: &ChunkDigest) -> bool {
        self.chunks.contains_key(digest)
    }

    /// Number of distinct digests
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Later occurrences discarded by first-wins insertion
    pub fn duplicates_collapsed(&self) -> usize {
        self.duplicates
    }

    /// Bytes covered by the indexed (distinct) chunks
    pub fn total_bytes(&self) -> u64 {
        self.chunks.values().map(|c| c.length as u64).sum()
    }

    /// Indexed chunks in unspecified order
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn into_chunks(self) -> impl Iterator<Item = Chunk> {
        self.chunks.into_values()
    }
}
