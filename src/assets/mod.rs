//! Asset ingestion and project-root layout.

pub mod media;
pub mod store;

pub use media::{decode_audio, decode_audio_bytes, is_ffmpeg_on_path};
pub use store::ProjectStore;
