//! Delta classification between file versions
//!
//! Builds digest-keyed signatures from content-defined chunks and classifies
//! an updated file's chunks as reused or changed against an original.

pub mod delta;
pub mod error;
pub mod files;
pub mod rolling_hash;
pub mod signature;

pub use delta::{classify, Delta, DeltaStats, DiffEngine};
pub use error::{DiffError, DiffResult, Side};
pub use files::{diff_files, file_diff};
pub use rolling_hash::{BuzHash, RollingHash, WeightTable, WEIGHT_SEED};
pub use signature::SignatureIndex;
