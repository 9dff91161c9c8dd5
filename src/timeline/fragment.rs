//! Fragment assembly: one token sequence in, one fragment buffer out.

use crate::audio::AudioBuffer;
use crate::config::Voice;
use crate::foundation::error::VoxweaveResult;
use crate::markup::Token;
use crate::tts::SpeechRenderer;

/// Assemble one fragment buffer from its token sequence.
///
/// Literal tokens are rendered to speech and appended as they arrive; pause
/// tokens append silence of exactly `seconds * 1000` milliseconds. Rendered
/// clips are transient; nothing per-token is persisted. An empty token
/// sequence yields an empty buffer, not an error; any renderer failure aborts
/// the whole assembly.
pub fn assemble<I>(
    tokens: I,
    renderer: &dyn SpeechRenderer,
    voice: Voice,
    tempo_percent: i32,
) -> VoxweaveResult<AudioBuffer>
where
    I: IntoIterator<Item = Token>,
{
    let mut assembled = AudioBuffer::empty();
    for token in tokens {
        assembled = match token {
            Token::Literal(text) => {
                let clip = renderer.render(&text, voice, tempo_percent)?;
                assembled.append(&clip)
            }
            Token::Pause(seconds) => {
                assembled.append(&AudioBuffer::silence(seconds.saturating_mul(1000)))
            }
        };
    }
    Ok(assembled)
}
