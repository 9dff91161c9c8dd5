//! Voxweave assembles finished spoken-word audio from authored text fragments.
//!
//! Fragment texts may embed `{pause=N}` directives; each fragment renders to
//! speech through a [`SpeechRenderer`] and persists as one MP3. Composition
//! concatenates the saved fragments between lead-in/lead-out silence, loops
//! and fades an optional background bed underneath, and exports the final mix.
//! The public API is session-oriented:
//!
//! - Open a [`NarrationSession`] over a project directory (or load a
//!   [`NarrationPlan`] from JSON)
//! - Save fragments with [`NarrationSession::save_fragment`]
//! - Produce the final mix with [`NarrationSession::compose`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod audio;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod markup;
pub mod session;
pub mod timeline;
pub mod tts;

pub use crate::assets::{ProjectStore, decode_audio, decode_audio_bytes, is_ffmpeg_on_path};
pub use crate::audio::{AudioBuffer, MIX_CHANNELS, MIX_SAMPLE_RATE};
pub use crate::config::{CompositionConfig, Voice, volume_gain_db};
pub use crate::encode::write_mp3;
pub use crate::foundation::core::FragmentId;
pub use crate::foundation::error::{VoxweaveError, VoxweaveResult};
pub use crate::markup::{Token, segment};
pub use crate::session::{MAX_FRAGMENT_CHARS, NarrationPlan, NarrationSession};
pub use crate::timeline::{assemble, build_voice_track, compose, prepare_background};
pub use crate::tts::{HttpSpeechRenderer, InMemoryRenderer, SpeechRenderer, tempo_rate_string};
