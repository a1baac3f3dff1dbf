//! Bit-depth quantization ("bitcrush") for 16-bit voice samples.

/// Quantize every sample to a multiple of `quant`, then scale by `gain_factor`.
///
/// Each sample is divided by `quant`, truncated toward zero, multiplied back
/// and scaled. Results outside the `i16` range saturate to `i16::MIN` /
/// `i16::MAX`; a NaN intermediate becomes 0.
///
/// `quant` must be greater than zero. Other values do not panic but the
/// output is meaningless (`quant == 0` silences the buffer).
pub fn bitcrush(samples: &mut [i16], quant: f32, gain_factor: f32) {
    for sample in samples.iter_mut() {
        *sample = crush_sample(*sample, quant, gain_factor);
    }
}

#[inline]
fn crush_sample(sample: i16, quant: f32, gain_factor: f32) -> i16 {
    let steps = (f32::from(sample) / quant).trunc();
    // float → int `as` casts saturate and map NaN to 0
    (steps * quant * gain_factor) as i16
}
