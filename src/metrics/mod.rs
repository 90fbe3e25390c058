//! Metrics for chunking and diff operations
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op. Key metrics:
//! - Diffs computed and failed
//! - Chunks and bytes classified as reused or changed
//! - Chunking pass sizes and diff duration

pub mod recorder;

pub use recorder::{
    init_metrics, record_chunking_pass, record_diff, record_diff_failed, DiffTimer,
};
