//! MP3 export through the system `ffmpeg` binary.
//!
//! The full mix is always materialized in memory before any bytes touch disk:
//! PCM is streamed to ffmpeg over stdin, encoded into a temporary sibling of the
//! final path, and renamed into place only after a clean exit. A failed export
//! therefore never disturbs a previously exported file at the same name.

use std::io::{Read as _, Write as _};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::assets::media::is_ffmpeg_on_path;
use crate::audio::buffer::AudioBuffer;
use crate::foundation::error::{VoxweaveError, VoxweaveResult};

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> VoxweaveResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encode `buffer` as MP3 at `out_path`, overwriting any existing file there.
///
/// We intentionally use the system `ffmpeg` binary rather than linking an
/// encoder library, matching the decode side.
pub fn write_mp3(buffer: &AudioBuffer, out_path: &Path) -> VoxweaveResult<()> {
    ensure_parent_dir(out_path)?;

    if !is_ffmpeg_on_path() {
        return Err(VoxweaveError::export(
            "ffmpeg is required for MP3 export, but was not found on PATH",
        ));
    }

    let parent = out_path.parent().unwrap_or_else(|| Path::new("."));
    let staging = tempfile::Builder::new()
        .prefix(".voxweave-")
        .suffix(".mp3")
        .tempfile_in(parent)
        .map_err(|e| VoxweaveError::export(format!("failed to create staging file: {e}")))?;

    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd.args([
        "-y",
        "-loglevel",
        "error",
        "-f",
        "f32le",
        "-ar",
        &buffer.sample_rate().to_string(),
        "-ac",
        &buffer.channels().to_string(),
        "-i",
        "pipe:0",
        "-c:a",
        "libmp3lame",
        "-q:a",
        "2",
    ])
    .arg(staging.path());

    let mut child = cmd.spawn().map_err(|e| {
        VoxweaveError::export(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| VoxweaveError::export("failed to open ffmpeg stdin (unexpected)"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| VoxweaveError::export("failed to open ffmpeg stderr (unexpected)"))?;

    // Drain stderr off-thread so ffmpeg can never block on a full pipe while we
    // are still feeding stdin.
    let stderr_drain = std::thread::spawn(move || {
        let mut stderr_bytes = Vec::new();
        stderr.read_to_end(&mut stderr_bytes)?;
        Ok::<_, std::io::Error>(stderr_bytes)
    });

    // Chunked so a long mix never needs a second full-size byte copy.
    let mut feed_err = None;
    for chunk in buffer.samples().chunks(8192) {
        if let Err(e) = stdin.write_all(&f32le_bytes(chunk)) {
            feed_err = Some(e);
            break;
        }
    }
    drop(stdin);

    if let Some(e) = feed_err {
        // A failed write usually means ffmpeg already died; reap it before
        // returning rather than leaving the child behind.
        let _ = child.kill();
        let _ = child.wait();
        let _ = stderr_drain.join();
        return Err(VoxweaveError::export(format!(
            "failed to write PCM to ffmpeg stdin: {e}"
        )));
    }

    let status = child
        .wait()
        .map_err(|e| VoxweaveError::export(format!("failed to wait for ffmpeg to finish: {e}")))?;
    let stderr_bytes = stderr_drain
        .join()
        .map_err(|_| VoxweaveError::export("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| VoxweaveError::export(format!("ffmpeg stderr read failed: {e}")))?;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr_bytes);
        return Err(VoxweaveError::export(format!(
            "ffmpeg exited with status {status}: {}",
            stderr.trim()
        )));
    }

    staging.persist(out_path).map_err(|e| {
        VoxweaveError::export(format!(
            "failed to publish '{}': {}",
            out_path.display(),
            e.error
        ))
    })?;

    Ok(())
}

fn f32le_bytes(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::<u8>::with_capacity(samples.len() * 4);
    for &sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_bytes_are_little_endian_in_sample_order() {
        let bytes = f32le_bytes(&[1.0, -0.5]);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &(-0.5f32).to_le_bytes());
    }
}
