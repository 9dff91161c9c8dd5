//! Narration sessions.
//!
//! A session is the explicit, ordered fragment registry plus the two
//! operations that drive the pipeline end to end: saving one fragment and
//! composing the final mix. It owns no configuration; every call takes an
//! explicit [`CompositionConfig`] snapshot.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::{ProjectStore, decode_audio};
use crate::audio::AudioBuffer;
use crate::config::CompositionConfig;
use crate::encode::write_mp3;
use crate::foundation::core::FragmentId;
use crate::foundation::error::{VoxweaveError, VoxweaveResult};
use crate::markup::segment;
use crate::timeline::{assemble, build_voice_track, compose, prepare_background};
use crate::tts::SpeechRenderer;

/// Upper bound on one fragment's authored text, in characters.
pub const MAX_FRAGMENT_CHARS: usize = 2500;

/// Serialized session plan.
///
/// This is the JSON-facing, human-edited representation of a session: the
/// authored fragment texts in order, plus one composition snapshot.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NarrationPlan {
    pub fragments: Vec<String>,
    #[serde(default)]
    pub config: CompositionConfig,
}

impl NarrationPlan {
    /// Parse a plan from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VoxweaveResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| VoxweaveError::validation(format!("parse narration plan JSON: {e}")))
    }

    /// Parse a plan from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VoxweaveResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VoxweaveError::validation(format!("open narration plan '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate fragment budgets and the embedded config.
    pub fn validate(&self) -> VoxweaveResult<()> {
        for (i, text) in self.fragments.iter().enumerate() {
            if text.chars().count() > MAX_FRAGMENT_CHARS {
                return Err(VoxweaveError::validation(format!(
                    "fragment {} exceeds {MAX_FRAGMENT_CHARS} characters",
                    i + 1
                )));
            }
        }
        self.config.validate()
    }
}

/// A narration session over one project directory.
///
/// Fragments register append-only in authored order; each owns exactly one
/// persisted file slot keyed by its 1-based id, and no save ever touches
/// another fragment's slot. Composing reads whichever fragment files currently
/// exist and writes the final mix under the chosen output name.
pub struct NarrationSession {
    store: ProjectStore,
    fragments: Vec<String>,
}

impl NarrationSession {
    /// Open a session over `root` with no registered fragments.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            store: ProjectStore::new(root),
            fragments: Vec::new(),
        }
    }

    /// Open a session pre-loaded with a plan's fragment texts.
    pub fn from_plan(root: impl Into<PathBuf>, plan: &NarrationPlan) -> VoxweaveResult<Self> {
        plan.validate()?;
        let mut session = Self::new(root);
        for text in &plan.fragments {
            session.add_fragment(text.clone());
        }
        Ok(session)
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Register a new fragment at the end of the authored order.
    pub fn add_fragment(&mut self, text: impl Into<String>) -> FragmentId {
        self.fragments.push(text.into());
        FragmentId(self.fragments.len() as u32)
    }

    /// Replace the authored text of a registered fragment.
    ///
    /// The persisted audio is untouched until the fragment is saved again.
    pub fn update_fragment(
        &mut self,
        id: FragmentId,
        text: impl Into<String>,
    ) -> VoxweaveResult<()> {
        let idx = self.slot_index(id)?;
        self.fragments[idx] = text.into();
        Ok(())
    }

    /// Authored text of a registered fragment.
    pub fn fragment_text(&self, id: FragmentId) -> Option<&str> {
        let idx = (id.0 as usize).checked_sub(1)?;
        self.fragments.get(idx).map(String::as_str)
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    fn slot_index(&self, id: FragmentId) -> VoxweaveResult<usize> {
        (id.0 as usize)
            .checked_sub(1)
            .filter(|&idx| idx < self.fragments.len())
            .ok_or_else(|| VoxweaveError::validation(format!("unknown fragment id {id}")))
    }

    /// Render one fragment's markup to speech and persist it.
    ///
    /// Empty or whitespace-only text is nothing to do (`Ok(None)`). The
    /// persisted file is replaced only once the full buffer is assembled; a
    /// renderer failure leaves the previous save intact.
    #[tracing::instrument(skip(self, renderer, config))]
    pub fn save_fragment(
        &self,
        id: FragmentId,
        renderer: &dyn SpeechRenderer,
        config: &CompositionConfig,
    ) -> VoxweaveResult<Option<PathBuf>> {
        let idx = self.slot_index(id)?;
        let text = self.fragments[idx].trim();
        if text.is_empty() {
            return Ok(None);
        }
        if text.chars().count() > MAX_FRAGMENT_CHARS {
            return Err(VoxweaveError::validation(format!(
                "fragment {id} exceeds {MAX_FRAGMENT_CHARS} characters"
            )));
        }
        config.validate()?;

        let buffer = assemble(segment(text), renderer, config.voice, config.tempo_percent)?;
        let path = self.store.fragment_path(id);
        write_mp3(&buffer, &path)?;
        Ok(Some(path))
    }

    /// Compose every saved fragment into the final mix at `output_name`.
    ///
    /// An empty output name is nothing to do (`Ok(None)`). Fragment slots that
    /// were never saved are skipped. A selected background whose asset is
    /// missing or decodes to zero duration degrades to voice-only output; any
    /// other failure aborts and leaves a previous mix at that name intact.
    #[tracing::instrument(skip(self, config))]
    pub fn compose(
        &self,
        output_name: &str,
        config: &CompositionConfig,
    ) -> VoxweaveResult<Option<PathBuf>> {
        let output_name = output_name.trim();
        if output_name.is_empty() {
            return Ok(None);
        }
        config.validate()?;
        let out_path = self.store.output_path(output_name)?;

        // One writer per output name: last writer wins, never a torn file.
        let lock = self.store.output_lock(output_name);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut fragments = Vec::new();
        for n in 1..=self.fragments.len() as u32 {
            let path = self.store.fragment_path(FragmentId(n));
            if !path.exists() {
                continue; // not yet authored
            }
            fragments.push(decode_audio(&path)?);
        }

        let voice_track =
            build_voice_track(fragments, config.start_delay_ms, config.end_delay_ms);
        let background = self.prepared_background(config, voice_track.duration_ms())?;
        let mix = compose(voice_track, background);

        write_mp3(&mix, &out_path)?;
        Ok(Some(out_path))
    }

    fn prepared_background(
        &self,
        config: &CompositionConfig,
        target_ms: u64,
    ) -> VoxweaveResult<Option<AudioBuffer>> {
        let Some(name) = config.background.as_deref() else {
            return Ok(None);
        };
        let path = self.store.background_path(name)?;
        if !path.exists() {
            tracing::warn!(background = name, "background asset not found, composing voice-only");
            return Ok(None);
        }
        let source = decode_audio(&path)?;
        match prepare_background(
            source,
            target_ms,
            config.fade_in_ms,
            config.fade_out_ms,
            config.background_volume_percent,
        ) {
            Ok(bed) => Ok(Some(bed)),
            Err(VoxweaveError::AssetMissing(reason)) => {
                tracing::warn!(
                    background = name,
                    reason = %reason,
                    "background unusable, composing voice-only"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
