use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;

use super::error::Result;
use super::stream::ChunkStream;
use super::types::{Chunk, ChunkerConfig};
use crate::sync::rolling_hash::{BuzHash, RollingHash, WeightTable};

/// Content-defined chunker.
///
/// Slides a [`BuzHash`] window over the buffer and cuts after every position
/// whose hash has all `mask` bits clear, plus once at the end of the buffer.
/// The window at position `i` covers `[i + 1, i + window]`; near the end of
/// the buffer the incoming byte is clamped to the last one, so boundary
/// probability in the final `window` bytes differs from `1 / chunk_size`.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    table: Arc<WeightTable>,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        Self::with_table(config, Arc::new(WeightTable::new()))
    }

    /// Build a chunker sharing an existing weight table
    pub fn with_table(config: ChunkerConfig, table: Arc<WeightTable>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    pub fn table(&self) -> &Arc<WeightTable> {
        &self.table
    }

    /// Split `data` into chunks that cover it contiguously, in order
    pub fn chunk(&self, data: Bytes) -> Vec<Chunk> {
        let len = data.len();
        let mut chunks = Vec::with_capacity(len / self.config.chunk_size + 1);
        if len == 0 {
            return chunks;
        }

        let window = self.config.window_size;
        let mask = self.config.mask();
        let mut hash = BuzHash::new(self.table.clone(), window);
        hash.initialize(&data, window.min(len));

        let mut start = 0;
        for i in 0..len {
            let incoming = i.saturating_add(window).min(len - 1);
            let current = hash.roll(data[i], data[incoming]);

            if u64::from(current) & mask == 0 || i == len - 1 {
                chunks.push(Chunk::new(start as u64, data.slice(start..=i)));
                start = i + 1;
            }
        }

        crate::metrics::record_chunking_pass(len, chunks.len());
        tracing::debug!(
            bytes = len,
            chunks = chunks.len(),
            chunk_size = self.config.chunk_size,
            "Chunked buffer"
        );

        chunks
    }

    /// Same as [`Chunker::chunk`] for a borrowed buffer (copies it once)
    pub fn chunk_slice(&self, data: &[u8]) -> Vec<Chunk> {
        self.chunk(Bytes::copy_from_slice(data))
    }

    /// Chunk a reader incrementally. Yields the same chunks as
    /// [`Chunker::chunk`] over the reader's full contents.
    pub fn stream<R: Read>(&self, reader: R) -> ChunkStream<R> {
        ChunkStream::new(
            reader,
            BuzHash::new(self.table.clone(), self.config.window_size),
            self.config.mask(),
        )
    }
}
