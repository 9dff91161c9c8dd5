//! Final overlay of voice over the prepared background.

use crate::audio::AudioBuffer;

/// Mix the voice track over an optional prepared background bed.
///
/// The bed is the base layer and the voice is superimposed additively at zero
/// offset; the voice track already carries its own lead-in/lead-out silence.
/// Without a bed the voice track passes through untouched. Both operands share
/// one duration by construction (the bed was prepared against the voice
/// track's length), so no redundant re-validation happens here.
pub fn compose(voice_track: AudioBuffer, background: Option<AudioBuffer>) -> AudioBuffer {
    match background {
        Some(bed) => bed.overlay(&voice_track),
        None => voice_track,
    }
}
