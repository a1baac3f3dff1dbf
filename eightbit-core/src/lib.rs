//! # eightbit-core
//!
//! Lo-fi voice effects and WAV capture for decoded voice-chat PCM.
//!
//! The host plugin intercepts voice packets, decodes them to 16-bit mono
//! samples and hands each buffer to this crate: optionally bitcrushed or
//! desampled in place, optionally appended to a per-user WAV recording.
//!
//! ## Architecture
//!
//! ```text
//! eightbit-core (this crate)
//! ├── models/       ← CaptureError, RecorderState, Effect, configuration, RecordingResult
//! ├── processing/   ← bitcrush, Desampler, EffectChain, WAV header
//! ├── storage/      ← WavFileWriter, RecordingPathBuilder
//! ├── session/      ← VoiceRecorder, VoicePipeline
//! └── traits/       ← Clock
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{CaptureConfiguration, EffectSettings};
pub use models::effect::Effect;
pub use models::error::CaptureError;
pub use models::recording_result::RecordingResult;
pub use models::state::RecorderState;
pub use processing::bitcrush::bitcrush;
pub use processing::desample::Desampler;
pub use processing::effect_chain::EffectChain;
pub use processing::wav_format::{WaveFileHeader, WAV_HEADER_SIZE};
pub use session::recorder::VoiceRecorder;
pub use session::voice_pipeline::{SharedPipeline, UserId, VoicePipeline};
pub use storage::naming::RecordingPathBuilder;
pub use storage::wav_writer::WavFileWriter;
pub use traits::clock::{Clock, FixedClock, SystemClock};
