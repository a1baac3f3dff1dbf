pub mod bitcrush;
pub mod desample;
pub mod effect_chain;
pub mod wav_format;
