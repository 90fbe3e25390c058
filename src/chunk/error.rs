use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("Invalid chunk size: {0} is not a power of two")]
    InvalidChunkSize(usize),

    #[error("Invalid window size: {0} (must be between 1 and 65536)")]
    InvalidWindowSize(usize),
}

pub type Result<T> = std::result::Result<T, ChunkError>;
