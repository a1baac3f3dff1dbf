use std::path::PathBuf;

use super::error::CaptureError;

/// Default sample rate of decoded voice packets in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// Highest sample rate accepted for capture in Hz.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Default desample scratch capacity in samples.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 10 * 1024;

/// Configuration for WAV capture sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfiguration {
    /// Sample rate written into the header (default: 24000).
    pub sample_rate: u32,

    /// Bit depth for PCM output. Only 16 is supported.
    pub bit_depth: u16,

    /// Number of channels. Only mono is supported.
    pub channels: u16,

    /// Directory where recording files are written. Created on demand.
    pub output_directory: PathBuf,

    /// Leading component of every file name (default: `user`).
    pub file_prefix: String,
}

impl CaptureConfiguration {
    pub fn with_output_directory(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(CaptureError::InvalidParameter(format!(
                "sample rate must be in 1..={}, got {}",
                MAX_SAMPLE_RATE, self.sample_rate
            )));
        }
        if self.bit_depth != 16 {
            return Err(CaptureError::InvalidParameter(format!(
                "unsupported bit depth: {}",
                self.bit_depth
            )));
        }
        if self.channels != 1 {
            return Err(CaptureError::InvalidParameter(format!(
                "unsupported channel count: {}",
                self.channels
            )));
        }
        if self.file_prefix.is_empty() {
            return Err(CaptureError::InvalidParameter(
                "file prefix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: 16,
            channels: 1,
            output_directory: PathBuf::from("garrysmod/recordings"),
            file_prefix: "user".into(),
        }
    }
}

/// Parameters for the lo-fi transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSettings {
    /// Bitcrush quantization step (default: 350.0).
    pub quant: f32,

    /// Gain applied after quantization (default: 1.2).
    pub gain: f32,

    /// Every `desample_rate`-th sample is dropped (default: 2).
    pub desample_rate: usize,

    /// Largest buffer the desampler accepts, in samples.
    pub scratch_capacity: usize,
}

impl EffectSettings {
    pub fn validate(&self) -> Result<(), CaptureError> {
        if !self.quant.is_finite() || self.quant <= 0.0 {
            return Err(CaptureError::InvalidParameter(format!(
                "quantization step must be positive, got {}",
                self.quant
            )));
        }
        if !self.gain.is_finite() {
            return Err(CaptureError::InvalidParameter(format!(
                "gain must be finite, got {}",
                self.gain
            )));
        }
        if self.desample_rate == 0 {
            return Err(CaptureError::InvalidParameter(
                "desample rate must be at least 1".into(),
            ));
        }
        if self.scratch_capacity == 0 {
            return Err(CaptureError::InvalidParameter(
                "scratch capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            quant: 350.0,
            gain: 1.2,
            desample_rate: 2,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
        }
    }
}
