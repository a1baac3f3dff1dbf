pub mod recorder;
pub mod voice_pipeline;
