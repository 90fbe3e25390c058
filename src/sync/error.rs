use std::fmt;
use thiserror::Error;

use crate::chunk::ChunkError;

/// Which input of a comparison an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Original,
    Updated,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Original => "original",
            Side::Updated => "updated",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ChunkError),

    #[error("Failed to read {side} file: {source}")]
    Io {
        side: Side,
        #[source]
        source: std::io::Error,
    },
}

impl DiffError {
    pub(crate) fn io(side: Side, source: std::io::Error) -> Self {
        crate::metrics::record_diff_failed(side.as_str());
        tracing::warn!("Failed to read {} file: {}", side, source);
        DiffError::Io { side, source }
    }
}

pub type DiffResult<T> = Result<T, DiffError>;
