//! Voice track building: saved fragments bracketed by lead-in/lead-out silence.

use crate::audio::AudioBuffer;

/// Concatenate fragment buffers in fragment order between `start_delay_ms` of
/// leading and `end_delay_ms` of trailing silence.
///
/// The caller supplies only the fragments that exist on disk; indices that were
/// never saved simply do not appear in the sequence and contribute nothing.
/// The result lasts exactly `start_delay_ms + sum(fragments) + end_delay_ms`.
pub fn build_voice_track<I>(fragments: I, start_delay_ms: u64, end_delay_ms: u64) -> AudioBuffer
where
    I: IntoIterator<Item = AudioBuffer>,
{
    let mut track = AudioBuffer::silence(start_delay_ms);
    for fragment in fragments {
        track = track.append(&fragment);
    }
    track.append(&AudioBuffer::silence(end_delay_ms))
}
