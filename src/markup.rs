//! Pause-directive markup segmentation.
//!
//! Fragment text mixes literal speech with `{pause=N}` directives (N in whole
//! seconds). [`segment`] walks the text left to right and yields the spans between
//! and around well-formed directives as trimmed literal tokens. Matching is strict:
//! anything that is not exactly `{pause=<non-negative integer>}` fails to match and
//! flows through as literal text rather than raising an error.

use once_cell::sync::Lazy;
use regex::Regex;

static PAUSE_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{pause=(\d+)\}").expect("pause directive pattern is valid"));

/// One segmented unit of fragment text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Trimmed, non-empty text span destined for the speech renderer.
    Literal(String),
    /// Pause length in whole seconds.
    Pause(u64),
}

/// Lazily segment `text` into literal and pause tokens, in source order.
///
/// Whitespace-only spans between directives are dropped. The iterator borrows the
/// input; re-segmenting is a fresh call.
pub fn segment(text: &str) -> Segments<'_> {
    Segments {
        text,
        directives: PAUSE_DIRECTIVE.captures_iter(text),
        cursor: 0,
        queued: None,
    }
}

/// Iterator over the tokens of one fragment text. Created by [`segment`].
pub struct Segments<'a> {
    text: &'a str,
    directives: regex::CaptureMatches<'static, 'a>,
    cursor: usize,
    queued: Option<Token>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(tok) = self.queued.take() {
            return Some(tok);
        }

        match self.directives.next() {
            Some(caps) => {
                let m = caps.get(0)?;
                let gap = &self.text[self.cursor..m.start()];
                self.cursor = m.end();

                let directive = match caps[1].parse::<u64>() {
                    Ok(secs) => Token::Pause(secs),
                    // An argument too large for whole seconds fails strict
                    // matching; the raw span flows through as literal text.
                    Err(_) => Token::Literal(m.as_str().to_string()),
                };

                let gap = gap.trim();
                if gap.is_empty() {
                    return Some(directive);
                }
                self.queued = Some(directive);
                Some(Token::Literal(gap.to_string()))
            }
            None => {
                if self.cursor >= self.text.len() {
                    return None;
                }
                let tail = self.text[self.cursor..].trim();
                self.cursor = self.text.len();
                if tail.is_empty() {
                    return None;
                }
                Some(Token::Literal(tail.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        segment(text).collect()
    }

    #[test]
    fn plain_text_yields_one_trimmed_literal() {
        assert_eq!(
            tokens("  Hello there.  "),
            vec![Token::Literal("Hello there.".to_string())]
        );
    }

    #[test]
    fn empty_and_whitespace_only_yield_nothing() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \n\t ").is_empty());
    }

    #[test]
    fn directive_splits_surrounding_text() {
        assert_eq!(
            tokens("A {pause=2} B"),
            vec![
                Token::Literal("A".to_string()),
                Token::Pause(2),
                Token::Literal("B".to_string()),
            ]
        );
    }

    #[test]
    fn lone_directive_and_zero_seconds() {
        assert_eq!(tokens("{pause=0}"), vec![Token::Pause(0)]);
        assert_eq!(tokens("{pause=10}"), vec![Token::Pause(10)]);
    }

    #[test]
    fn adjacent_directives_drop_whitespace_gaps() {
        assert_eq!(
            tokens("{pause=1} \n {pause=2}"),
            vec![Token::Pause(1), Token::Pause(2)]
        );
    }

    #[test]
    fn malformed_directives_pass_through_as_literal_text() {
        assert_eq!(
            tokens("{pause=-2}"),
            vec![Token::Literal("{pause=-2}".to_string())]
        );
        assert_eq!(
            tokens("{pause=two}"),
            vec![Token::Literal("{pause=two}".to_string())]
        );
        assert_eq!(
            tokens("wait {pause=3"),
            vec![Token::Literal("wait {pause=3".to_string())]
        );
        assert_eq!(tokens("{pause=}"), vec![Token::Literal("{pause=}".to_string())]);
    }

    #[test]
    fn doubled_braces_match_only_the_inner_directive() {
        assert_eq!(
            tokens("{{pause=2}}"),
            vec![
                Token::Literal("{".to_string()),
                Token::Pause(2),
                Token::Literal("}".to_string()),
            ]
        );
    }

    #[test]
    fn oversized_argument_degrades_to_literal() {
        // 20 nines exceeds u64 seconds; strict matching fails spanwise.
        let raw = "{pause=99999999999999999999}";
        assert_eq!(tokens(raw), vec![Token::Literal(raw.to_string())]);
    }

    #[test]
    fn token_order_follows_source_order() {
        assert_eq!(
            tokens("intro {pause=1} middle {pause=4} outro"),
            vec![
                Token::Literal("intro".to_string()),
                Token::Pause(1),
                Token::Literal("middle".to_string()),
                Token::Pause(4),
                Token::Literal("outro".to_string()),
            ]
        );
    }
}
