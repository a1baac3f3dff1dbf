use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::processing::wav_format::WaveFileHeader;

/// Streaming WAV file writer for 16-bit mono PCM.
///
/// ## File Format
/// ```text
/// [44-byte WAV header, sizes zero until finalize]
/// [raw little-endian 16-bit PCM data...]
/// ```
///
/// Samples are appended in input order with no buffering beyond the file
/// handle itself. `finalize` rewrites the whole header at offset 0.
#[derive(Debug)]
pub struct WavFileWriter {
    file_path: PathBuf,
    file: Option<File>,
    header: WaveFileHeader,
    samples_written: u32,
}

impl WavFileWriter {
    pub fn new(file_path: PathBuf, config: &CaptureConfiguration) -> Result<Self, CaptureError> {
        Ok(Self {
            file_path,
            file: None,
            header: WaveFileHeader::new(config.sample_rate, config.bit_depth, config.channels)?,
            samples_written: 0,
        })
    }

    /// Writer over an already-open handle, header assumed written.
    #[cfg(test)]
    pub(crate) fn from_open_file(
        file_path: PathBuf,
        file: File,
        config: &CaptureConfiguration,
    ) -> Result<Self, CaptureError> {
        let mut writer = Self::new(file_path, config)?;
        writer.file = Some(file);
        Ok(writer)
    }

    /// Create the parent directory and file, then write the placeholder header.
    pub fn open(&mut self) -> Result<(), CaptureError> {
        if self.file.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CaptureError::DirectoryCreation(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let mut file = File::create(&self.file_path).map_err(|e| {
            CaptureError::FileOpen(format!("{}: {}", self.file_path.display(), e))
        })?;

        self.header.update_sizes(0);
        file.write_all(&self.header.to_bytes())
            .map_err(|e| CaptureError::Storage(format!("header write failed: {}", e)))?;

        self.file = Some(file);
        self.samples_written = 0;
        Ok(())
    }

    /// Append samples as little-endian bytes.
    pub fn write_samples(&mut self, samples: &[i16]) -> Result<(), CaptureError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| CaptureError::Storage("file is not open for writing".into()))?;
        if samples.is_empty() {
            return Ok(());
        }

        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        file.write_all(&bytes)
            .map_err(|e| CaptureError::Storage(format!("write failed: {}", e)))?;

        let count = u32::try_from(samples.len()).unwrap_or(u32::MAX);
        self.samples_written = self.samples_written.saturating_add(count);
        Ok(())
    }

    /// Patch the header with the final sizes and close the file.
    ///
    /// Returns the header that was written.
    pub fn finalize(&mut self) -> Result<WaveFileHeader, CaptureError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| CaptureError::Storage("file is not open".into()))?;

        let bytes_per_sample = self.header.bits_per_sample() as u32 / 8;
        self.header.update_sizes(self.samples_written.saturating_mul(bytes_per_sample));

        file.seek(SeekFrom::Start(0))
            .map_err(|e| CaptureError::Storage(e.to_string()))?;
        file.write_all(&self.header.to_bytes())
            .map_err(|e| CaptureError::Storage(e.to_string()))?;
        file.flush().map_err(|e| CaptureError::Storage(e.to_string()))?;

        Ok(self.header)
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn samples_written(&self) -> u32 {
        self.samples_written
    }

    /// Path of the output file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}
