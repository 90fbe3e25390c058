//! Content-defined chunking
//!
//! Splits byte buffers (or readers) into variable-length chunks whose
//! boundaries depend only on nearby content, and fingerprints each chunk
//! with BLAKE3.

pub mod chunker;
pub mod error;
pub mod stream;
pub mod types;

pub use chunker::Chunker;
pub use error::{ChunkError, Result};
pub use stream::ChunkStream;
pub use types::{
    Chunk, ChunkDigest, ChunkerConfig, DEFAULT_CHUNK_SIZE, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE,
};
