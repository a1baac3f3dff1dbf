use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::{CaptureConfiguration, EffectSettings};
use crate::models::effect::Effect;
use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingResult;
use crate::processing::effect_chain::EffectChain;
use crate::storage::naming::RecordingPathBuilder;
use crate::traits::clock::{Clock, SystemClock};

use super::recorder::VoiceRecorder;

/// Host-side identifier of a speaking user.
pub type UserId = u64;

/// Pipeline shared between the host's game thread and its voice thread.
pub type SharedPipeline = Arc<Mutex<VoicePipeline>>;

/// Per-buffer voice processing driven by a host plugin.
///
/// Data flow:
/// ```text
/// [decoded PCM] → [EffectChain] → [VoiceRecorder for user, if any] → host voice pipeline
/// ```
///
/// Recorders are keyed by user. Dropping the pipeline finalizes every open
/// recording.
#[derive(Debug)]
pub struct VoicePipeline {
    chain: EffectChain,
    config: CaptureConfiguration,
    paths: RecordingPathBuilder,
    recorders: HashMap<UserId, VoiceRecorder>,
}

impl VoicePipeline {
    pub fn new(config: CaptureConfiguration) -> Result<Self, CaptureError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: CaptureConfiguration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CaptureError> {
        config.validate()?;
        let paths = RecordingPathBuilder::with_clock(
            config.output_directory.clone(),
            config.file_prefix.clone(),
            clock,
        );
        Ok(Self {
            chain: EffectChain::default(),
            config,
            paths,
            recorders: HashMap::new(),
        })
    }

    pub fn into_shared(self) -> SharedPipeline {
        Arc::new(Mutex::new(self))
    }

    pub fn effect(&self) -> Effect {
        self.chain.effect()
    }

    pub fn set_effect(&mut self, effect: Effect) {
        self.chain.set_effect(effect);
    }

    pub fn effect_settings(&self) -> &EffectSettings {
        self.chain.settings()
    }

    pub fn set_effect_settings(&mut self, settings: EffectSettings) -> Result<(), CaptureError> {
        self.chain.set_settings(settings)
    }

    /// Apply the active effect to one decoded buffer and record it if `user` is
    /// being captured.
    ///
    /// Returns the number of valid samples in `samples[..n]`. A buffer the
    /// effect rejects is left unmodified and is not recorded. A failed capture
    /// write is logged and does not affect the result, since the voice path
    /// must keep flowing.
    pub fn process(&mut self, user: UserId, samples: &mut [i16]) -> Result<usize, CaptureError> {
        let kept = match self.chain.apply(samples) {
            Ok(kept) => kept,
            Err(e) => {
                log::warn!("Voice buffer from user {} rejected: {}", user, e);
                return Err(e);
            }
        };

        if let Some(recorder) = self.recorders.get_mut(&user) {
            if let Err(e) = recorder.write_audio_data(&samples[..kept]) {
                log::error!("Failed to record voice from user {}: {}", user, e);
            }
        }
        Ok(kept)
    }

    /// Like [`process`](Self::process), truncating the vector to the kept length.
    pub fn process_vec(
        &mut self,
        user: UserId,
        samples: &mut Vec<i16>,
    ) -> Result<usize, CaptureError> {
        let kept = self.process(user, samples.as_mut_slice())?;
        samples.truncate(kept);
        Ok(kept)
    }

    pub fn start_recording(&mut self, user: UserId) -> Result<PathBuf, CaptureError> {
        if self.is_recording(user) {
            return Err(CaptureError::AlreadyRecording);
        }

        let mut recorder =
            VoiceRecorder::with_path_builder(self.config.clone(), self.paths.clone())?;
        let path = recorder.start_recording(user)?;
        self.recorders.insert(user, recorder);
        Ok(path)
    }

    /// Finalize the recording for `user`. `Ok(None)` if none was open.
    pub fn stop_recording(
        &mut self,
        user: UserId,
    ) -> Result<Option<RecordingResult>, CaptureError> {
        match self.recorders.remove(&user) {
            Some(mut recorder) => recorder.stop_recording(),
            None => Ok(None),
        }
    }

    /// Finalize every open recording, attempting all of them before
    /// reporting the first failure.
    pub fn stop_all(&mut self) -> Result<Vec<RecordingResult>, CaptureError> {
        let mut results = Vec::with_capacity(self.recorders.len());
        let mut first_error = None;

        for (user, mut recorder) in self.recorders.drain() {
            match recorder.stop_recording() {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => {
                    log::error!("Failed to finalize recording for user {}: {}", user, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }

    pub fn is_recording(&self, user: UserId) -> bool {
        self.recorders.get(&user).is_some_and(VoiceRecorder::is_recording)
    }

    pub fn active_recordings(&self) -> usize {
        self.recorders.len()
    }
}
