use std::path::PathBuf;

/// Result returned when a recording is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    /// Absolute path of the finalized WAV file.
    pub file_path: PathBuf,
    pub samples_written: u32,
    /// Size of the `data` sub-chunk in bytes.
    pub data_size: u32,
    pub duration_secs: f64,
}

impl RecordingResult {
    pub fn new(
        file_path: PathBuf,
        samples_written: u32,
        bytes_per_sample: u32,
        sample_rate: u32,
    ) -> Self {
        let duration_secs = if sample_rate == 0 {
            0.0
        } else {
            samples_written as f64 / sample_rate as f64
        };
        Self {
            file_path,
            samples_written,
            data_size: samples_written.saturating_mul(bytes_per_sample),
            duration_secs,
        }
    }
}
