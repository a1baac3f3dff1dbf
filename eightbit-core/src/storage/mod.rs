pub mod naming;
pub mod wav_writer;
