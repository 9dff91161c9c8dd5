//! Owned PCM buffers and the time-domain transforms the compositor is built from.
//!
//! Every transform consumes the buffer and returns a new one; nothing mutates
//! shared state. Buffers that meet in `append`/`overlay` must share one sample
//! format; the pipeline guarantees this by normalizing every asset to the mix
//! format at decode time rather than re-checking at each call site.

use crate::foundation::core::{frames_to_ms, ms_to_frames};
use crate::foundation::error::{VoxweaveError, VoxweaveResult};

/// Fixed pipeline sample rate. Every decoded asset is resampled to this.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Fixed pipeline channel count (interleaved stereo).
pub const MIX_CHANNELS: u16 = 2;

/// Decoded, interleaved `f32` audio with a fixed sample rate and channel count.
///
/// Duration is a deterministic function of frame count and sample rate;
/// concatenation sums frame counts exactly, so durations add without drift.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: u16,
    interleaved: Vec<f32>,
}

impl AudioBuffer {
    /// Zero-length buffer in the mix format.
    pub fn empty() -> Self {
        Self {
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
            interleaved: Vec::new(),
        }
    }

    /// Silent buffer of exactly `ms` milliseconds in the mix format.
    pub fn silence(ms: u64) -> Self {
        let frames = ms_to_frames(ms, MIX_SAMPLE_RATE) as usize;
        Self {
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
            interleaved: vec![0.0; frames * usize::from(MIX_CHANNELS)],
        }
    }

    /// Wrap raw interleaved samples. Validates the format once, at ingestion.
    pub fn from_interleaved(
        sample_rate: u32,
        channels: u16,
        interleaved: Vec<f32>,
    ) -> VoxweaveResult<Self> {
        if sample_rate == 0 {
            return Err(VoxweaveError::validation("sample rate must be > 0"));
        }
        if channels == 0 {
            return Err(VoxweaveError::validation("channel count must be > 0"));
        }
        if !interleaved.len().is_multiple_of(usize::from(channels)) {
            return Err(VoxweaveError::validation(
                "interleaved sample count must be a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            interleaved,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Interleaved sample view.
    pub fn samples(&self) -> &[f32] {
        &self.interleaved
    }

    /// Consume the buffer, returning the interleaved samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.interleaved
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> u64 {
        (self.interleaved.len() / usize::from(self.channels)) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.interleaved.is_empty()
    }

    /// Duration in whole milliseconds, rounded half-up.
    pub fn duration_ms(&self) -> u64 {
        frames_to_ms(self.frames(), self.sample_rate)
    }

    /// Concatenate `other` after `self`. Both sides must share the sample format.
    pub fn append(mut self, other: &AudioBuffer) -> Self {
        self.interleaved.extend_from_slice(&other.interleaved);
        self
    }

    /// Apply a uniform gain of `db` decibels (`10^(db/20)` linear).
    pub fn gain_db(mut self, db: f64) -> Self {
        let gain = 10f64.powf(db / 20.0) as f32;
        for s in &mut self.interleaved {
            *s *= gain;
        }
        self
    }

    /// Linear fade-in over the first `ms` milliseconds.
    ///
    /// The ramp slope is fixed by the window length; a buffer shorter than the
    /// window never reaches unity gain.
    pub fn fade_in(mut self, ms: u64) -> Self {
        let window = ms_to_frames(ms, self.sample_rate);
        if window == 0 || self.interleaved.is_empty() {
            return self;
        }
        let ch = usize::from(self.channels);
        let frames = self.interleaved.len() / ch;
        let faded = frames.min(window as usize);
        for frame in 0..faded {
            let t = frame as f32 / window as f32;
            for c in 0..ch {
                self.interleaved[frame * ch + c] *= t;
            }
        }
        self
    }

    /// Linear fade-out over the last `ms` milliseconds.
    ///
    /// Overlapping a fade-in window attenuates the shared samples by both ramps
    /// multiplicatively.
    pub fn fade_out(mut self, ms: u64) -> Self {
        let window = ms_to_frames(ms, self.sample_rate);
        if window == 0 || self.interleaved.is_empty() {
            return self;
        }
        let ch = usize::from(self.channels);
        let frames = self.interleaved.len() / ch;
        let faded = frames.min(window as usize);
        for frame in (frames - faded)..frames {
            let remaining = (frames - frame) as f32;
            let t = (remaining / window as f32).min(1.0);
            for c in 0..ch {
                self.interleaved[frame * ch + c] *= t;
            }
        }
        self
    }

    /// Tile the whole buffer `count` times back to back.
    pub fn repeated(mut self, count: u64) -> Self {
        if count <= 1 || self.interleaved.is_empty() {
            return self;
        }
        let src_len = self.interleaved.len();
        self.interleaved
            .reserve(src_len.saturating_mul(count as usize - 1));
        for _ in 1..count {
            self.interleaved.extend_from_within(0..src_len);
        }
        self
    }

    /// Hard-cut the buffer to `[0, target_ms)`. Buffers already at or below the
    /// target length are returned unchanged; nothing is ever padded.
    pub fn trimmed_to(mut self, target_ms: u64) -> Self {
        let keep =
            ms_to_frames(target_ms, self.sample_rate) as usize * usize::from(self.channels);
        if keep < self.interleaved.len() {
            self.interleaved.truncate(keep);
        }
        self
    }

    /// Additively mix `voice` over `self` at zero offset, `self` as the base
    /// layer, clamping the result to `[-1, 1]`.
    ///
    /// The result keeps the base layer's length; both operands share it by
    /// construction in the compose path.
    pub fn overlay(mut self, voice: &AudioBuffer) -> Self {
        let shared = self.interleaved.len().min(voice.interleaved.len());
        for i in 0..shared {
            self.interleaved[i] += voice.interleaved[i];
        }
        for s in &mut self.interleaved {
            *s = s.clamp(-1.0, 1.0);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(samples: Vec<f32>) -> AudioBuffer {
        // 4 Hz mono keeps the arithmetic small enough to check by hand.
        AudioBuffer::from_interleaved(4, 1, samples).unwrap()
    }

    #[test]
    fn silence_duration_is_exact() {
        assert_eq!(AudioBuffer::silence(0).duration_ms(), 0);
        assert_eq!(AudioBuffer::silence(2000).duration_ms(), 2000);
        assert_eq!(AudioBuffer::silence(2000).frames(), 96_000);
        assert_eq!(AudioBuffer::empty().duration_ms(), 0);
    }

    #[test]
    fn from_interleaved_validates_format_once() {
        assert!(AudioBuffer::from_interleaved(0, 2, vec![]).is_err());
        assert!(AudioBuffer::from_interleaved(48_000, 0, vec![]).is_err());
        assert!(AudioBuffer::from_interleaved(48_000, 2, vec![0.0; 3]).is_err());
        assert!(AudioBuffer::from_interleaved(48_000, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn append_sums_durations_exactly() {
        let mut buf = AudioBuffer::empty();
        for ms in [1000, 2000, 800] {
            buf = buf.append(&AudioBuffer::silence(ms));
        }
        assert_eq!(buf.duration_ms(), 3800);
        assert_eq!(buf.frames(), 48 * 3800);
    }

    #[test]
    fn gain_is_decibel_scaled() {
        let buf = mono(vec![0.5]).gain_db(-20.0);
        assert!((buf.samples()[0] - 0.05).abs() < 1e-6);

        let unchanged = mono(vec![0.5]).gain_db(0.0);
        assert_eq!(unchanged.samples()[0], 0.5);

        // -50 dB then +50 dB round-trips within float tolerance.
        let round = mono(vec![0.5]).gain_db(-50.0).gain_db(50.0);
        assert!((round.samples()[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn fade_in_ramps_linearly_from_zero() {
        let buf = mono(vec![1.0; 4]).fade_in(1000);
        assert_eq!(buf.samples(), &[0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn fade_out_ramps_linearly_to_the_end() {
        let buf = mono(vec![1.0; 4]).fade_out(1000);
        assert_eq!(buf.samples(), &[1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn overlapping_fades_multiply() {
        let buf = mono(vec![1.0; 4]).fade_in(1000).fade_out(1000);
        assert_eq!(buf.samples(), &[0.0, 0.1875, 0.25, 0.1875]);
    }

    #[test]
    fn fade_window_longer_than_buffer_never_reaches_unity() {
        // 2 s window over a 1 s buffer: ramp stops at half gain.
        let buf = mono(vec![1.0; 4]).fade_in(2000);
        assert_eq!(buf.samples(), &[0.0, 0.125, 0.25, 0.375]);
    }

    #[test]
    fn repeated_tiles_whole_copies() {
        let buf = mono(vec![0.1, 0.2]).repeated(3);
        assert_eq!(buf.samples(), &[0.1, 0.2, 0.1, 0.2, 0.1, 0.2]);
        assert_eq!(mono(vec![0.1, 0.2]).repeated(1).samples().len(), 2);
    }

    #[test]
    fn trim_is_a_hard_cut_and_never_pads() {
        let buf = AudioBuffer::silence(3000).trimmed_to(1000);
        assert_eq!(buf.duration_ms(), 1000);

        let short = AudioBuffer::silence(500).trimmed_to(1000);
        assert_eq!(short.duration_ms(), 500);
    }

    #[test]
    fn overlay_is_additive_and_clamped() {
        let base = mono(vec![0.5, -0.5, 0.25, 0.875]);
        let voice = mono(vec![0.75, -0.75, 0.125]);
        let mixed = base.overlay(&voice);
        assert_eq!(mixed.samples(), &[1.0, -1.0, 0.375, 0.875]);
    }

    #[test]
    fn overlay_keeps_base_length() {
        let base = AudioBuffer::silence(2000);
        let voice = AudioBuffer::silence(1000);
        assert_eq!(base.overlay(&voice).duration_ms(), 2000);
    }
}
