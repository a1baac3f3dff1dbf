use crate::models::config::EffectSettings;
use crate::models::effect::Effect;
use crate::models::error::CaptureError;

use super::bitcrush::bitcrush;
use super::desample::Desampler;

/// Applies the selected lo-fi effect to decoded voice buffers.
///
/// Owns the desample scratch storage sized from `EffectSettings::scratch_capacity`.
#[derive(Debug, Clone)]
pub struct EffectChain {
    effect: Effect,
    settings: EffectSettings,
    desampler: Desampler,
}

impl EffectChain {
    pub fn new(effect: Effect, settings: EffectSettings) -> Result<Self, CaptureError> {
        settings.validate()?;
        Ok(Self {
            effect,
            settings,
            desampler: Desampler::new(settings.scratch_capacity),
        })
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn settings(&self) -> &EffectSettings {
        &self.settings
    }

    pub fn set_effect(&mut self, effect: Effect) {
        if effect != self.effect {
            log::debug!("Voice effect changed: {} -> {}", self.effect, effect);
        }
        self.effect = effect;
    }

    /// Replace the parameters. Invalid settings leave the current ones in place.
    pub fn set_settings(&mut self, settings: EffectSettings) -> Result<(), CaptureError> {
        settings.validate()?;
        if settings.scratch_capacity != self.desampler.capacity() {
            self.desampler = Desampler::new(settings.scratch_capacity);
        }
        self.settings = settings;
        Ok(())
    }

    /// Transform `samples` in place and return the number of valid samples.
    ///
    /// Only `Effect::Desample` shortens the buffer; the valid samples are
    /// always `samples[..n]`.
    pub fn apply(&mut self, samples: &mut [i16]) -> Result<usize, CaptureError> {
        match self.effect {
            Effect::None => Ok(samples.len()),
            Effect::BitCrush => {
                bitcrush(samples, self.settings.quant, self.settings.gain);
                Ok(samples.len())
            }
            Effect::Desample => self.desampler.process(samples, self.settings.desample_rate),
        }
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        let settings = EffectSettings::default();
        Self {
            effect: Effect::None,
            settings,
            desampler: Desampler::new(settings.scratch_capacity),
        }
    }
}
