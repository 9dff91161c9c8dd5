//! Speech renderer backed by a synthesis web service.

use std::time::Duration;

use crate::assets::decode_audio_bytes;
use crate::audio::AudioBuffer;
use crate::config::Voice;
use crate::foundation::error::{VoxweaveError, VoxweaveResult};
use crate::tts::{SpeechRenderer, tempo_rate_string};

/// Default timeout for one synthesis request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// [`SpeechRenderer`](crate::tts::SpeechRenderer) that POSTs to a
/// speech-synthesis endpoint.
///
/// The request body is `{ "input", "voice", "rate" }`; the response is
/// compressed audio, decoded into the mix format before it is returned.
#[derive(Debug)]
pub struct HttpSpeechRenderer {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpSpeechRenderer {
    /// Create a renderer for `endpoint` with the default request timeout.
    pub fn new(endpoint: impl Into<String>) -> VoxweaveResult<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a renderer with an explicit request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> VoxweaveResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| VoxweaveError::render(format!("failed to build http client: {err}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key: None,
            client,
        })
    }

    /// Attach a bearer token sent with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl SpeechRenderer for HttpSpeechRenderer {
    fn render(&self, text: &str, voice: Voice, tempo_percent: i32) -> VoxweaveResult<AudioBuffer> {
        let body = serde_json::json!({
            "input": text,
            "voice": voice.service_id(),
            "rate": tempo_rate_string(tempo_percent),
        });
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|err| VoxweaveError::render(format!("speech request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(VoxweaveError::render(format!(
                "speech service returned {status}: {}",
                detail.trim()
            )));
        }

        let bytes = response.bytes().map_err(|err| {
            VoxweaveError::render(format!("failed to read speech response: {err}"))
        })?;
        let clip = decode_audio_bytes(&bytes)?;
        if clip.is_empty() {
            return Err(VoxweaveError::render("speech service returned no audio"));
        }
        Ok(clip)
    }
}
