//! PCM buffer model and transforms.

pub mod buffer;

pub use buffer::{AudioBuffer, MIX_CHANNELS, MIX_SAMPLE_RATE};
