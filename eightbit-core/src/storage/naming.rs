use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::traits::clock::{Clock, SystemClock};

/// Timestamp layout embedded in recording file names (one-second resolution).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Builds `{directory}/{prefix}_{identifier}_{YYYYmmdd_HHMMSS}.wav` paths.
///
/// The timestamp is the last underscore-separated component and has a fixed
/// width, so two paths taken in the same second differ whenever their
/// identifiers differ. Identifiers that could leave the directory (path
/// separators, control characters, empty) are rejected rather than rewritten.
#[derive(Clone)]
pub struct RecordingPathBuilder {
    directory: PathBuf,
    prefix: String,
    clock: Arc<dyn Clock>,
}

impl RecordingPathBuilder {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self::with_clock(directory, prefix, Arc::new(SystemClock))
    }

    pub fn with_clock(
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            clock,
        }
    }

    pub fn file_name(&self, identifier: impl Display) -> Result<String, CaptureError> {
        let identifier = identifier.to_string();
        let unsafe_char = |c: char| c == '/' || c == '\\' || c.is_control();
        if identifier.is_empty() || identifier.chars().any(unsafe_char) {
            return Err(CaptureError::InvalidParameter(format!(
                "identifier not usable in a file name: {:?}",
                identifier
            )));
        }

        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT);
        Ok(format!("{}_{}_{}.wav", self.prefix, identifier, timestamp))
    }

    pub fn build(&self, identifier: impl Display) -> Result<PathBuf, CaptureError> {
        Ok(self.directory.join(self.file_name(identifier)?))
    }
}

impl std::fmt::Debug for RecordingPathBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingPathBuilder")
            .field("directory", &self.directory)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
