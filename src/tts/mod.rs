//! Speech rendering boundary.
//!
//! The timeline only ever sees [`SpeechRenderer`]: text plus voice settings in,
//! decoded PCM out. [`HttpSpeechRenderer`] talks to a real synthesis service;
//! [`InMemoryRenderer`] serves canned clips for tests.

pub mod http;

pub use http::HttpSpeechRenderer;

use std::collections::HashMap;

use crate::audio::AudioBuffer;
use crate::config::Voice;
use crate::foundation::error::{VoxweaveError, VoxweaveResult};

/// Renderer contract for turning one literal text run into speech audio.
///
/// Implementations must return audio already in the mix format; failures are
/// reported as render errors and abort the calling operation.
pub trait SpeechRenderer {
    /// Synthesize `text` spoken by `voice` at the given tempo adjustment.
    fn render(&self, text: &str, voice: Voice, tempo_percent: i32) -> VoxweaveResult<AudioBuffer>;
}

/// Format a tempo percentage the way the speech service expects it.
///
/// The sign is always explicit: `+15%`, `-10%`, `+0%`.
pub fn tempo_rate_string(tempo_percent: i32) -> String {
    format!("{tempo_percent:+}%")
}

/// In-memory renderer for tests and debugging.
///
/// Serves pre-registered clips keyed by exact text; unknown text is a render
/// error, same as a service failure.
#[derive(Debug, Default)]
pub struct InMemoryRenderer {
    clips: HashMap<String, AudioBuffer>,
}

impl InMemoryRenderer {
    /// Create a renderer with no registered clips.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the clip returned for `text`.
    pub fn insert(&mut self, text: impl Into<String>, clip: AudioBuffer) {
        self.clips.insert(text.into(), clip);
    }
}

impl SpeechRenderer for InMemoryRenderer {
    fn render(&self, text: &str, _voice: Voice, _tempo_percent: i32) -> VoxweaveResult<AudioBuffer> {
        self.clips
            .get(text)
            .cloned()
            .ok_or_else(|| VoxweaveError::render(format!("no registered clip for text: {text:?}")))
    }
}
