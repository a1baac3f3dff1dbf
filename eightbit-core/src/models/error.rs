use thiserror::Error;

/// Errors that can occur while transforming voice buffers or writing captures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("failed to create recording directory: {0}")]
    DirectoryCreation(String),

    #[error("failed to open recording file: {0}")]
    FileOpen(String),

    #[error("storage error: {0}")]
    Storage(String),

    /// Desample input longer than the scratch buffer. Nothing was modified.
    #[error("buffer of {len} samples exceeds scratch capacity of {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("invalid WAV header: {0}")]
    InvalidHeader(String),
}
