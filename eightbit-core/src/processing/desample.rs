//! Periodic sample discarding ("desample") for 16-bit voice samples.

use crate::models::config::DEFAULT_SCRATCH_CAPACITY;
use crate::models::error::CaptureError;

/// Periodic sample discarding with an owned, bounded scratch buffer.
///
/// Every sample whose index is a multiple of the desample rate is dropped and
/// the survivors are packed to the front of the caller's buffer. Each
/// `Desampler` owns its scratch storage, so concurrent callers each need their
/// own instance.
#[derive(Debug, Clone)]
pub struct Desampler {
    scratch: Vec<i16>,
    capacity: usize,
}

impl Desampler {
    /// Accept buffers of up to `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            scratch: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum input length in samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples `process` keeps from a buffer of `len` samples.
    pub fn output_len(len: usize, desample_rate: usize) -> usize {
        if desample_rate == 0 {
            return len;
        }
        len - len.div_ceil(desample_rate)
    }

    /// Drop every `desample_rate`-th sample (indices 0, rate, 2·rate, ...).
    ///
    /// Kept samples are written to `samples[..n]` in order and `n` is
    /// returned; the tail beyond `n` is left untouched. Buffers longer than
    /// [`capacity`](Self::capacity) are rejected without modification.
    pub fn process(
        &mut self,
        samples: &mut [i16],
        desample_rate: usize,
    ) -> Result<usize, CaptureError> {
        if desample_rate == 0 {
            return Err(CaptureError::InvalidParameter("desample rate must be at least 1".into()));
        }
        if samples.len() > self.capacity {
            return Err(CaptureError::CapacityExceeded {
                len: samples.len(),
                capacity: self.capacity,
            });
        }

        self.scratch.clear();
        self.scratch.extend(
            samples
                .iter()
                .enumerate()
                .filter(|(i, _)| i % desample_rate != 0)
                .map(|(_, &s)| s),
        );

        let kept = self.scratch.len();
        samples[..kept].copy_from_slice(&self.scratch);
        Ok(kept)
    }

    /// Like [`process`](Self::process), truncating the vector to the kept length.
    pub fn process_vec(
        &mut self,
        samples: &mut Vec<i16>,
        desample_rate: usize,
    ) -> Result<usize, CaptureError> {
        let kept = self.process(samples.as_mut_slice(), desample_rate)?;
        samples.truncate(kept);
        Ok(kept)
    }
}

impl Default for Desampler {
    fn default() -> Self {
        Self::new(DEFAULT_SCRATCH_CAPACITY)
    }
}
