//! Entry points comparing two byte sources

use std::io::Read;
use std::path::Path;

use bytes::Bytes;

use crate::chunk::ChunkerConfig;
use crate::sync::delta::{Delta, DiffEngine};
use crate::sync::error::{DiffError, DiffResult, Side};

/// Diff two readers with the default window and the given chunk size.
///
/// The chunk size is validated before anything is read. A read failure on
/// either side aborts with no partial delta.
pub fn file_diff<A: Read, B: Read>(
    original: A,
    updated: B,
    chunk_size: usize,
) -> DiffResult<Delta> {
    let engine = DiffEngine::new(ChunkerConfig::new(chunk_size))?;
    engine.diff_reader(original, updated)
}

/// Read both files into memory, then diff them
pub async fn diff_files(
    original: &Path,
    updated: &Path,
    config: ChunkerConfig,
) -> DiffResult<Delta> {
    let engine = DiffEngine::new(config)?;

    let original_data = tokio::fs::read(original)
        .await
        .map_err(|e| DiffError::io(Side::Original, e))?;
    let updated_data = tokio::fs::read(updated)
        .await
        .map_err(|e| DiffError::io(Side::Updated, e))?;

    tracing::debug!(
        original = %original.display(),
        updated = %updated.display(),
        original_bytes = original_data.len(),
        updated_bytes = updated_data.len(),
        "Loaded files for diff"
    );

    Ok(engine.diff_bytes(Bytes::from(original_data), Bytes::from(updated_data)))
}
