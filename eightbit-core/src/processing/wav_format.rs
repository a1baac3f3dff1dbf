//! WAV file format utilities.
//!
//! Models the canonical 44-byte RIFF/WAVE header of an uncompressed PCM
//! stream and keeps its derived fields consistent with the fixed ones.

use crate::models::config::DEFAULT_SAMPLE_RATE;
use crate::models::error::CaptureError;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Bytes in a RIFF chunk size that precede the `data` payload (header minus 8).
const RIFF_OVERHEAD: u32 = 36;

const PCM_FORMAT_SIZE: u32 = 16;
const PCM_FORMAT_CODE: u16 = 1;

/// In-memory form of the 44-byte WAV header.
///
/// Derived fields (`byte_rate`, `block_align`, `chunk_size`) are private and
/// only computed from the fixed ones, so a header can never be serialized in
/// an inconsistent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveFileHeader {
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    byte_rate: u32,
    block_align: u16,
    chunk_size: u32,
    data_size: u32,
}

impl WaveFileHeader {
    /// Header for an empty PCM stream.
    ///
    /// Fails when the derived byte rate or block align does not fit its field.
    pub fn new(
        sample_rate: u32,
        bits_per_sample: u16,
        channels: u16,
    ) -> Result<Self, CaptureError> {
        let (byte_rate, block_align) =
            derived_rates(sample_rate, bits_per_sample, channels).ok_or_else(|| {
                CaptureError::InvalidParameter(format!(
                    "byte rate overflows for {} Hz, {} bits, {} channels",
                    sample_rate, bits_per_sample, channels
                ))
            })?;
        Ok(Self {
            channels,
            sample_rate,
            bits_per_sample,
            byte_rate,
            block_align,
            chunk_size: RIFF_OVERHEAD,
            data_size: 0,
        })
    }

    /// Set the data sub-chunk size and the RIFF chunk size derived from it.
    pub fn update_sizes(&mut self, data_size: u32) {
        self.data_size = data_size;
        self.chunk_size = RIFF_OVERHEAD.saturating_add(data_size);
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn byte_rate(&self) -> u32 {
        self.byte_rate
    }

    pub fn block_align(&self) -> u16 {
        self.block_align
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Serialize to little-endian bytes.
    ///
    /// Layout:
    /// ```text
    /// [0-3]    "RIFF"
    /// [4-7]    chunk_size = 36 + data_size
    /// [8-11]   "WAVE"
    /// [12-15]  "fmt "
    /// [16-19]  16 (PCM format chunk size)
    /// [20-21]  1 (PCM format code)
    /// [22-23]  channels
    /// [24-27]  sample_rate
    /// [28-31]  byte_rate = sample_rate * channels * bits_per_sample / 8
    /// [32-33]  block_align = channels * bits_per_sample / 8
    /// [34-35]  bits_per_sample
    /// [36-39]  "data"
    /// [40-43]  data_size
    /// ```
    pub fn to_bytes(&self) -> [u8; WAV_HEADER_SIZE] {
        let mut header = [0u8; WAV_HEADER_SIZE];

        // RIFF chunk descriptor
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&self.chunk_size.to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        // fmt sub-chunk
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&PCM_FORMAT_SIZE.to_le_bytes());
        header[20..22].copy_from_slice(&PCM_FORMAT_CODE.to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());

        // data sub-chunk
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        header
    }

    /// Parse a canonical PCM header, rejecting anything whose derived fields
    /// disagree with its fixed fields.
    pub fn parse(bytes: &[u8]) -> Result<Self, CaptureError> {
        if bytes.len() < WAV_HEADER_SIZE {
            return Err(CaptureError::InvalidHeader(format!(
                "expected {} bytes, got {}",
                WAV_HEADER_SIZE,
                bytes.len()
            )));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(CaptureError::InvalidHeader("missing RIFF/WAVE tags".into()));
        }
        if &bytes[12..16] != b"fmt " || &bytes[36..40] != b"data" {
            return Err(CaptureError::InvalidHeader("missing fmt/data tags".into()));
        }
        if read_u32(bytes, 16) != PCM_FORMAT_SIZE || read_u16(bytes, 20) != PCM_FORMAT_CODE {
            return Err(CaptureError::InvalidHeader("not an uncompressed PCM header".into()));
        }

        let sample_rate = read_u32(bytes, 24);
        let bits_per_sample = read_u16(bytes, 34);
        let channels = read_u16(bytes, 22);
        let (byte_rate, block_align) = derived_rates(sample_rate, bits_per_sample, channels)
            .ok_or_else(|| CaptureError::InvalidHeader("byte rate overflows u32".into()))?;

        let mut header = Self {
            channels,
            sample_rate,
            bits_per_sample,
            byte_rate,
            block_align,
            chunk_size: RIFF_OVERHEAD,
            data_size: 0,
        };
        header.update_sizes(read_u32(bytes, 40));

        if header.byte_rate != read_u32(bytes, 28) || header.block_align != read_u16(bytes, 32) {
            return Err(CaptureError::InvalidHeader("byte rate or block align inconsistent".into()));
        }
        if header.chunk_size != read_u32(bytes, 4) {
            return Err(CaptureError::InvalidHeader(
                "chunk size inconsistent with data size".into(),
            ));
        }
        Ok(header)
    }
}

impl Default for WaveFileHeader {
    /// 24 kHz, 16-bit mono.
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: 16,
            byte_rate: DEFAULT_SAMPLE_RATE * 2,
            block_align: 2,
            chunk_size: RIFF_OVERHEAD,
            data_size: 0,
        }
    }
}

/// `(byte_rate, block_align)`, or `None` if either overflows its field.
fn derived_rates(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Option<(u32, u16)> {
    let byte_rate = sample_rate
        .checked_mul(channels as u32)?
        .checked_mul(bits_per_sample as u32)?
        / 8;
    let block_align = channels.checked_mul(bits_per_sample)? / 8;
    Some((byte_rate, block_align))
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_bytes(data_size: u32) -> [u8; WAV_HEADER_SIZE] {
        let mut header = WaveFileHeader::default();
        header.update_sizes(data_size);
        header.to_bytes()
    }

    #[test]
    fn header_riff_magic() {
        let header = default_bytes(0);
        assert_eq!(header.len(), 44);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_pcm_format() {
        let header = default_bytes(0);
        assert_eq!(read_u16(&header, 20), 1);
        assert_eq!(read_u32(&header, 16), 16);
    }

    #[test]
    fn default_is_24khz_mono_16bit() {
        let header = WaveFileHeader::default();
        assert_eq!(header.sample_rate(), 24000);
        assert_eq!(header.channels(), 1);
        assert_eq!(header.bits_per_sample(), 16);
        assert_eq!(header.byte_rate(), 48000);
        assert_eq!(header.block_align(), 2);
        assert_eq!(header.data_size(), 0);
        assert_eq!(header.chunk_size(), 36);
        assert_eq!(WaveFileHeader::new(24000, 16, 1).unwrap(), header);
    }

    #[test]
    fn derived_fields_hold_before_and_after_update() {
        let formats = [(24000, 16, 1), (48000, 16, 2), (8000, 8, 1), (44100, 32, 2)];
        for (rate, bits, channels) in formats {
            let mut header = WaveFileHeader::new(rate, bits, channels).unwrap();
            for data_size in [0u32, 2, 9600, 1 << 20] {
                header.update_sizes(data_size);
                assert_eq!(header.byte_rate(), rate * channels as u32 * bits as u32 / 8);
                assert_eq!(header.block_align(), channels * bits / 8);
                assert_eq!(header.chunk_size(), 36 + data_size);
                assert_eq!(header.sample_rate(), rate);
            }
        }
    }

    #[test]
    fn new_rejects_overflowing_rates() {
        assert!(matches!(
            WaveFileHeader::new(300_000_000, 16, 1),
            Err(CaptureError::InvalidParameter(_))
        ));
        assert!(matches!(
            WaveFileHeader::new(u32::MAX, 16, 1),
            Err(CaptureError::InvalidParameter(_))
        ));
        assert!(WaveFileHeader::new(24000, u16::MAX, u16::MAX).is_err());
    }

    #[test]
    fn serialized_fields_match_accessors() {
        let bytes = default_bytes(9600);

        assert_eq!(read_u32(&bytes, 4), 36 + 9600);
        assert_eq!(read_u16(&bytes, 22), 1);
        assert_eq!(read_u32(&bytes, 24), 24000);
        assert_eq!(read_u32(&bytes, 28), 48000);
        assert_eq!(read_u16(&bytes, 32), 2);
        assert_eq!(read_u16(&bytes, 34), 16);
        assert_eq!(read_u32(&bytes, 40), 9600);
    }

    #[test]
    fn parse_accepts_generated_header() {
        let mut header = WaveFileHeader::new(16000, 16, 1).unwrap();
        header.update_sizes(400);
        assert_eq!(WaveFileHeader::parse(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn parse_rejects_inconsistent_derived_fields() {
        let mut bytes = default_bytes(100);
        bytes[28..32].copy_from_slice(&1234u32.to_le_bytes());
        assert!(matches!(WaveFileHeader::parse(&bytes), Err(CaptureError::InvalidHeader(_))));

        let mut bytes = default_bytes(100);
        bytes[4..8].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(WaveFileHeader::parse(&bytes), Err(CaptureError::InvalidHeader(_))));
    }

    #[test]
    fn parse_rejects_overflowing_sample_rate() {
        let mut bytes = default_bytes(0);
        bytes[24..28].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(WaveFileHeader::parse(&bytes), Err(CaptureError::InvalidHeader(_))));

        let mut bytes = default_bytes(0);
        bytes[22..24].copy_from_slice(&u16::MAX.to_le_bytes());
        bytes[34..36].copy_from_slice(&u16::MAX.to_le_bytes());
        assert!(matches!(WaveFileHeader::parse(&bytes), Err(CaptureError::InvalidHeader(_))));
    }

    #[test]
    fn parse_rejects_short_or_foreign_input() {
        assert!(WaveFileHeader::parse(&[0u8; 10]).is_err());

        let mut bytes = default_bytes(0);
        bytes[0..4].copy_from_slice(b"RIFX");
        assert!(WaveFileHeader::parse(&bytes).is_err());
    }

    #[test]
    fn chunk_size_saturates_near_u32_max() {
        let mut header = WaveFileHeader::default();
        header.update_sizes(u32::MAX);
        assert_eq!(header.chunk_size(), u32::MAX);
    }
}
