pub mod config;
pub mod effect;
pub mod error;
pub mod recording_result;
pub mod state;
