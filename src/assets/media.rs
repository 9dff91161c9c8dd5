//! Compressed-audio decode through the system `ffmpeg` binary.
//!
//! Every asset entering the pipeline is normalized here, once, to the mix format
//! (48 kHz interleaved stereo `f32`); downstream concatenation and overlay rely on
//! that instead of per-call compatibility checks. We intentionally shell out to
//! `ffmpeg` rather than linking codec libraries, so the only system requirement is
//! the binary on PATH.

use std::io::Write as _;
use std::path::Path;

use crate::audio::buffer::{AudioBuffer, MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::foundation::error::{VoxweaveError, VoxweaveResult};

/// Return `true` when the `ffmpeg` binary is runnable.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Decode a compressed audio file to a mix-format buffer.
///
/// A source with no audio stream decodes to an empty buffer rather than an error;
/// callers decide whether emptiness is acceptable for their stage.
#[tracing::instrument]
pub fn decode_audio(path: &Path) -> VoxweaveResult<AudioBuffer> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &MIX_CHANNELS.to_string(),
            "-ar",
            &MIX_SAMPLE_RATE.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| VoxweaveError::decode(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        // ffmpeg reports a source without an audio stream as an error; treat it as
        // an empty buffer and let the caller decide.
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("does not contain any stream")
        {
            return Ok(AudioBuffer::empty());
        }
        return Err(VoxweaveError::decode(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    pcm_from_f32le(&out.stdout)
}

/// Decode in-memory compressed audio (a speech-service response body) to a
/// mix-format buffer.
///
/// The bytes are staged in a temporary file so the same ffmpeg invocation handles
/// container probing for both on-disk and in-memory sources.
pub fn decode_audio_bytes(bytes: &[u8]) -> VoxweaveResult<AudioBuffer> {
    let mut staging = tempfile::NamedTempFile::new()
        .map_err(|e| VoxweaveError::decode(format!("failed to stage audio bytes: {e}")))?;
    staging
        .write_all(bytes)
        .map_err(|e| VoxweaveError::decode(format!("failed to stage audio bytes: {e}")))?;
    decode_audio(staging.path())
}

fn pcm_from_f32le(bytes: &[u8]) -> VoxweaveResult<AudioBuffer> {
    if !bytes.len().is_multiple_of(4) {
        return Err(VoxweaveError::decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    AudioBuffer::from_interleaved(MIX_SAMPLE_RATE, MIX_CHANNELS, pcm)
}
