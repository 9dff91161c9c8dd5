//! Background bed preparation: gain, loop, trim, fades.

use crate::audio::AudioBuffer;
use crate::config::volume_gain_db;
use crate::foundation::core::ms_to_frames;
use crate::foundation::error::{VoxweaveError, VoxweaveResult};

/// Shape a background bed to sit under a voice track of `target_ms`.
///
/// The order is fixed: volume gain first (so every tiled repetition carries
/// it), then whole-copy tiling until the bed covers the target, then a hard
/// trim to exactly `target_ms`, then linear fade-in and fade-out on the
/// trimmed result. Overlapping fade windows multiply where they meet.
///
/// A source that decodes to zero whole milliseconds cannot cover any target
/// and is reported as a missing asset rather than looped indefinitely.
pub fn prepare_background(
    source: AudioBuffer,
    target_ms: u64,
    fade_in_ms: u64,
    fade_out_ms: u64,
    volume_percent: u32,
) -> VoxweaveResult<AudioBuffer> {
    if source.duration_ms() == 0 {
        return Err(VoxweaveError::asset_missing(
            "background asset decodes to zero duration",
        ));
    }

    let mut bed = source.gain_db(volume_gain_db(volume_percent));

    // Tile in the frame domain so the covered length is exact.
    let target_frames = ms_to_frames(target_ms, bed.sample_rate());
    if bed.frames() < target_frames {
        let copies = target_frames / bed.frames() + 1;
        bed = bed.repeated(copies);
    }

    Ok(bed
        .trimmed_to(target_ms)
        .fade_in(fade_in_ms)
        .fade_out(fade_out_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(ms: u64, level: f32) -> AudioBuffer {
        let frames = ms_to_frames(ms, 4) as usize;
        AudioBuffer::from_interleaved(4, 1, vec![level; frames]).unwrap()
    }

    #[test]
    fn shorter_source_is_looped_then_trimmed_to_target() {
        let bed = prepare_background(flat(1500, 0.5), 4000, 0, 0, 100).unwrap();
        assert_eq!(bed.duration_ms(), 4000);
    }

    #[test]
    fn equal_and_longer_sources_land_on_target_exactly() {
        let equal = prepare_background(flat(4000, 0.5), 4000, 0, 0, 100).unwrap();
        assert_eq!(equal.duration_ms(), 4000);

        let longer = prepare_background(flat(6000, 0.5), 4000, 0, 0, 100).unwrap();
        assert_eq!(longer.duration_ms(), 4000);
    }

    #[test]
    fn tiling_is_frame_exact_for_awkward_source_lengths() {
        // 333 ms at 48 kHz (15 984 frames) never divides the 10 s target evenly.
        let source = AudioBuffer::from_interleaved(48_000, 2, vec![0.25; 2 * 15_984]).unwrap();
        let bed = prepare_background(source, 10_000, 0, 0, 100).unwrap();
        assert_eq!(bed.frames(), 480_000);
        assert_eq!(bed.duration_ms(), 10_000);

        // A source a hair over one second still lands exactly on the target.
        let source = AudioBuffer::from_interleaved(48_000, 2, vec![0.25; 2 * 48_017]).unwrap();
        let bed = prepare_background(source, 3800, 0, 0, 100).unwrap();
        assert_eq!(bed.frames(), 182_400);
        assert_eq!(bed.duration_ms(), 3800);
    }

    #[test]
    fn gain_is_applied_before_tiling() {
        // 50% volume is -50 dB on every sample of every repetition.
        let bed = prepare_background(flat(1000, 0.8), 2000, 0, 0, 50).unwrap();
        let expected = 0.8 * 10f32.powf(-50.0 / 20.0);
        assert_eq!(bed.samples().len(), 8);
        for s in bed.samples() {
            assert!((s - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn fades_shape_the_trimmed_bed() {
        let bed = prepare_background(flat(1000, 1.0), 1000, 1000, 0, 100).unwrap();
        assert_eq!(bed.samples(), &[0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn zero_duration_source_is_a_missing_asset() {
        let empty = AudioBuffer::empty();
        let err = prepare_background(empty, 1000, 0, 0, 100).unwrap_err();
        assert!(err.to_string().starts_with("missing asset:"));

        // Sub-millisecond sources round to zero duration and fail the same way.
        let sub_ms = AudioBuffer::from_interleaved(48_000, 2, vec![0.0; 20]).unwrap();
        assert!(prepare_background(sub_ms, 1000, 0, 0, 100).is_err());
    }
}
