use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ChunkError, Result};

/// Default target chunk size (8 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Default rolling hash window width in bytes
pub const DEFAULT_WINDOW_SIZE: usize = 63;

/// Largest accepted rolling hash window width in bytes
pub const MAX_WINDOW_SIZE: usize = 64 * 1024;

/// BLAKE3 digest of a chunk's raw bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkDigest([u8; 32]);

impl ChunkDigest {
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkDigest({})", &self.to_hex()[..16])
    }
}

/// A contiguous slice of a source buffer, fingerprinted by its digest.
///
/// `data` is exactly the bytes `[offset, offset + length)` of the buffer the
/// chunk was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub offset: u64,
    pub length: usize,
    pub digest: ChunkDigest,
    pub data: Bytes,
}

impl Chunk {
    pub fn new(offset: u64, data: Bytes) -> Self {
        Self {
            offset,
            length: data.len(),
            digest: ChunkDigest::of(&data),
            data,
        }
    }

    /// Offset one past the last byte of this chunk
    pub fn end(&self) -> u64 {
        self.offset + self.length as u64
    }
}

/// Parameters shared by every chunking pass that has to agree on boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Target average chunk size, must be a power of two
    pub chunk_size: usize,
    /// Rolling hash window width in bytes
    pub window_size: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl ChunkerConfig {
    /// Create a config with the default window width
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Default::default()
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.chunk_size.is_power_of_two() {
            return Err(ChunkError::InvalidChunkSize(self.chunk_size));
        }
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(ChunkError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }

    /// Boundary mask applied to the rolling hash.
    ///
    /// The hash is 32 bits wide, so chunk sizes above 2^32 behave as 2^32.
    /// Only meaningful for a validated config; a zero chunk size yields 0.
    pub fn mask(&self) -> u64 {
        (self.chunk_size as u64).saturating_sub(1)
    }
}
