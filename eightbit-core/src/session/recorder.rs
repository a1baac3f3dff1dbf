use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingResult;
use crate::models::state::RecorderState;
use crate::storage::naming::RecordingPathBuilder;
use crate::storage::wav_writer::WavFileWriter;
use crate::traits::clock::Clock;

/// Captures one voice stream to a WAV file.
///
/// ```text
/// start_recording → write_audio_data* → stop_recording
/// ```
///
/// Writing while idle is silently discarded. Dropping a recorder that is
/// still recording finalizes the file first, so the header is correct on every
/// exit path of the owning scope.
#[derive(Debug)]
pub struct VoiceRecorder {
    config: CaptureConfiguration,
    paths: RecordingPathBuilder,
    state: RecorderState,
    writer: Option<WavFileWriter>,
}

impl VoiceRecorder {
    /// Recorder naming files from the system clock.
    pub fn new(config: CaptureConfiguration) -> Result<Self, CaptureError> {
        let paths =
            RecordingPathBuilder::new(config.output_directory.clone(), config.file_prefix.clone());
        Self::with_path_builder(config, paths)
    }

    pub fn with_clock(
        config: CaptureConfiguration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CaptureError> {
        let paths = RecordingPathBuilder::with_clock(
            config.output_directory.clone(),
            config.file_prefix.clone(),
            clock,
        );
        Self::with_path_builder(config, paths)
    }

    pub fn with_path_builder(
        config: CaptureConfiguration,
        paths: RecordingPathBuilder,
    ) -> Result<Self, CaptureError> {
        config.validate()?;
        Ok(Self {
            config,
            paths,
            state: RecorderState::Idle,
            writer: None,
        })
    }

    /// Recorder already in `Recording` state over `writer`.
    #[cfg(test)]
    pub(crate) fn from_open_writer(
        config: CaptureConfiguration,
        paths: RecordingPathBuilder,
        writer: WavFileWriter,
    ) -> Self {
        Self {
            config,
            paths,
            state: RecorderState::Recording,
            writer: Some(writer),
        }
    }

    /// Open a new file for `identifier` and write the placeholder header.
    ///
    /// Transitions: idle → recording. On failure the recorder stays idle.
    pub fn start_recording(&mut self, identifier: impl Display) -> Result<PathBuf, CaptureError> {
        if !self.state.is_idle() {
            return Err(CaptureError::AlreadyRecording);
        }

        match self.open_writer(identifier) {
            Ok(writer) => {
                let file_path = writer.file_path().to_path_buf();
                log::debug!("Recording started: {}", file_path.display());
                self.writer = Some(writer);
                self.state = RecorderState::Recording;
                Ok(file_path)
            }
            Err(e) => {
                log::error!("Failed to start recording: {}", e);
                Err(e)
            }
        }
    }

    fn open_writer(&self, identifier: impl Display) -> Result<WavFileWriter, CaptureError> {
        let mut writer = WavFileWriter::new(self.paths.build(identifier)?, &self.config)?;
        writer.open()?;
        Ok(writer)
    }

    /// Append samples to the open file. A no-op while idle.
    pub fn write_audio_data(&mut self, samples: &[i16]) -> Result<(), CaptureError> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_samples(samples),
            None => Ok(()),
        }
    }

    /// Patch the header with the final sizes and close the file.
    ///
    /// Transitions: recording → idle. Returns `Ok(None)` when already idle, so
    /// repeated calls leave the file untouched.
    pub fn stop_recording(&mut self) -> Result<Option<RecordingResult>, CaptureError> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(None);
        };
        self.state = RecorderState::Idle;

        let header = writer.finalize()?;
        let file_path = std::path::absolute(writer.file_path())
            .unwrap_or_else(|_| writer.file_path().to_path_buf());
        log::info!("WAV file saved: {}", file_path.display());

        Ok(Some(RecordingResult::new(
            file_path,
            writer.samples_written(),
            header.bits_per_sample() as u32 / 8,
            header.sample_rate(),
        )))
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Samples written to the current file, or 0 while idle.
    pub fn samples_written(&self) -> u32 {
        self.writer.as_ref().map_or(0, WavFileWriter::samples_written)
    }

    /// Path of the file being written, if recording.
    pub fn current_path(&self) -> Option<&Path> {
        self.writer.as_ref().map(WavFileWriter::file_path)
    }
}

impl Drop for VoiceRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.stop_recording() {
            log::error!("Failed to finalize recording on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::wav_format::WaveFileHeader;
    use crate::traits::clock::FixedClock;
    use chrono::NaiveDate;
    use std::fs;

    fn clock() -> Arc<dyn Clock> {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(21, 4, 5))
            .unwrap();
        Arc::new(FixedClock(at))
    }

    fn recorder(dir: &Path) -> VoiceRecorder {
        let config = CaptureConfiguration::with_output_directory(dir);
        VoiceRecorder::with_clock(config, clock()).unwrap()
    }

    #[test]
    fn start_write_stop() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = recorder(dir.path());
        assert!(!rec.is_recording());

        let path = rec.start_recording(42).unwrap();
        assert_eq!(path, dir.path().join("user_42_20240309_210405.wav"));
        assert!(rec.is_recording());

        rec.write_audio_data(&[1, 2, 3]).unwrap();
        rec.write_audio_data(&[4, 5]).unwrap();
        assert_eq!(rec.samples_written(), 5);

        let result = rec.stop_recording().unwrap().unwrap();
        assert!(!rec.is_recording());
        assert!(result.file_path.is_absolute());
        assert_eq!(result.samples_written, 5);
        assert_eq!(result.data_size, 10);

        let header = WaveFileHeader::parse(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(header.data_size(), 10);
        assert_eq!(header.chunk_size(), 46);
    }

    #[test]
    fn write_while_idle_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = recorder(dir.path());
        rec.write_audio_data(&[1, 2, 3]).unwrap();
        assert_eq!(rec.samples_written(), 0);
        assert!(rec.current_path().is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn stop_while_idle_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = recorder(dir.path());
        assert_eq!(rec.stop_recording().unwrap(), None);
    }

    #[test]
    fn double_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = recorder(dir.path());
        rec.start_recording(1).unwrap();
        assert_eq!(rec.start_recording(2).unwrap_err(), CaptureError::AlreadyRecording);
        assert!(rec.is_recording());
    }

    #[test]
    fn second_stop_leaves_bytes_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = recorder(dir.path());
        let path = rec.start_recording(9).unwrap();
        rec.write_audio_data(&[100, -100, 7]).unwrap();

        rec.stop_recording().unwrap();
        let once = fs::read(&path).unwrap();
        assert_eq!(rec.stop_recording().unwrap(), None);
        let twice = fs::read(&path).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn failed_start_stays_idle() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"file").unwrap();

        let mut rec = recorder(&blocker.join("recordings"));
        assert!(matches!(
            rec.start_recording(1),
            Err(CaptureError::DirectoryCreation(_))
        ));
        assert!(!rec.is_recording());
        assert_eq!(rec.state(), RecorderState::Idle);
    }

    #[test]
    fn drop_finalizes_open_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let mut rec = recorder(dir.path());
            let path = rec.start_recording(5).unwrap();
            rec.write_audio_data(&[1; 12]).unwrap();
            path
        };

        let header = WaveFileHeader::parse(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(header.data_size(), 24);
    }

    #[test]
    fn drop_finalizes_on_early_return() {
        fn record_then_fail(dir: &Path) -> Result<PathBuf, CaptureError> {
            let mut rec = recorder(dir);
            let path = rec.start_recording(6)?;
            rec.write_audio_data(&[3; 4])?;
            Err(CaptureError::Storage(path.display().to_string()))
        }

        let dir = tempfile::tempdir().unwrap();
        let Err(CaptureError::Storage(path)) = record_then_fail(dir.path()) else {
            panic!("expected storage error");
        };
        let header = WaveFileHeader::parse(&fs::read(path).unwrap()).unwrap();
        assert_eq!(header.data_size(), 8);
    }

    #[test]
    fn recorder_can_start_again_after_stop() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = recorder(dir.path());
        rec.start_recording(1).unwrap();
        rec.stop_recording().unwrap();

        let second = rec.start_recording(2).unwrap();
        assert!(rec.is_recording());
        assert_eq!(rec.samples_written(), 0);
        assert_eq!(rec.current_path(), Some(second.as_path()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = CaptureConfiguration {
            channels: 2,
            ..Default::default()
        };
        assert!(VoiceRecorder::new(config).is_err());
    }

    #[test]
    fn overflowing_sample_rate_is_rejected_at_construction() {
        let config = CaptureConfiguration {
            sample_rate: 300_000_000,
            ..Default::default()
        };
        assert!(matches!(
            VoiceRecorder::new(config),
            Err(CaptureError::InvalidParameter(_))
        ));
    }

    #[test]
    fn identifier_with_separator_stays_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = recorder(&dir.path().join("recordings"));

        assert!(matches!(
            rec.start_recording("../escape"),
            Err(CaptureError::InvalidParameter(_))
        ));
        assert!(!rec.is_recording());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
