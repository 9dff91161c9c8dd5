//! Compressed-audio serialization.

pub mod mp3;

pub use mp3::write_mp3;
