//! Content-defined chunking and delta classification.
//!
//! Two versions of a file are cut into variable-length chunks at boundaries
//! chosen by a rolling hash, each chunk is fingerprinted with BLAKE3, and
//! every chunk of the updated version is classified as reused (its content
//! exists in the original) or changed.
//!
//! ```no_run
//! use bytes::Bytes;
//! use chunkdiff::chunk::ChunkerConfig;
//! use chunkdiff::sync::DiffEngine;
//!
//! let engine = DiffEngine::new(ChunkerConfig::new(1024))?;
//! let mut delta = engine.diff_bytes(Bytes::from("old contents"), Bytes::from("new text"));
//! delta.sort_by_offset();
//! println!("{}", delta.stats());
//! # Ok::<(), chunkdiff::sync::DiffError>(())
//! ```

pub mod chunk;
pub mod metrics;
pub mod sync;

pub use chunk::{Chunk, ChunkDigest, ChunkError, Chunker, ChunkerConfig};
pub use sync::{diff_files, file_diff, Delta, DeltaStats, DiffEngine, DiffError, SignatureIndex};
