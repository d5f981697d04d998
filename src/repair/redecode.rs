// src/repair/redecode.rs

//! Blind re-decode: Latin-1 bytes reinterpreted as UTF-8
//!
//! Assumes the whole text is UTF-8 that was once decoded as Latin-1. Any
//! character above U+00FF, or any byte image that is not valid UTF-8, makes
//! the cycle fail, and a failed cycle changes nothing.

use crate::codec::{decode_utf8, encode_latin1, DecodeError};

/// Upper bound on re-decode cycles
pub const MAX_REDECODE_PASSES: u8 = 3;

/// One Latin-1 -> UTF-8 cycle
pub fn redecode(text: &str) -> Result<String, DecodeError> {
    decode_utf8(encode_latin1(text)?)
}

/// Outcome of an iterated re-decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redecoded {
    pub text: String,
    /// Cycles that succeeded and changed the text
    pub passes: u8,
    /// The error that ended the loop early, if any
    pub stopped_by: Option<DecodeError>,
}

/// Run up to `passes` cycles (clamped to `1..=MAX_REDECODE_PASSES`)
///
/// A failing first cycle leaves the text as it was. A failing later cycle
/// keeps the result of the cycles before it. A cycle that changes nothing
/// ends the loop, since every further cycle would be identical.
pub fn redecode_passes(text: &str, passes: u8) -> Redecoded {
    let limit = passes.clamp(1, MAX_REDECODE_PASSES);
    let mut current = text.to_string();
    let mut done = 0;

    for _ in 0..limit {
        match redecode(&current) {
            Ok(next) if next == current => break,
            Ok(next) => {
                current = next;
                done += 1;
            }
            Err(e) => {
                return Redecoded {
                    text: current,
                    passes: done,
                    stopped_by: Some(e),
                };
            }
        }
    }

    Redecoded {
        text: current,
        passes: done,
        stopped_by: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_latin1;

    fn latin1_garble(text: &str) -> String {
        decode_latin1(text.as_bytes())
    }

    #[test]
    fn test_single_cycle() {
        assert_eq!(redecode("GrÃ¶ÃŸe").ok(), None, "Ÿ is above U+00FF");
        assert_eq!(redecode(&latin1_garble("Größe")).unwrap(), "Größe");
    }

    #[test]
    fn test_correct_text_fails_closed() {
        // é is 0xE9 in Latin-1, a truncated UTF-8 lead byte
        let result = redecode_passes("café", 1);
        assert_eq!(result.text, "café");
        assert_eq!(result.passes, 0);
        assert_eq!(
            result.stopped_by,
            Some(DecodeError::InvalidUtf8 { valid_up_to: 3 })
        );
    }

    #[test]
    fn test_cafe_never_becomes_other_mojibake() {
        for passes in 1..=MAX_REDECODE_PASSES {
            let result = redecode_passes("café", passes);
            assert_eq!(result.text, "café");
        }
    }

    #[test]
    fn test_wide_chars_fail_closed() {
        let result = redecode_passes("Preis – GrÃ¶ÃŸe", 3);
        assert_eq!(result.text, "Preis – GrÃ¶ÃŸe");
        assert!(matches!(
            result.stopped_by,
            Some(DecodeError::Unencodable { ch: '–', .. })
        ));
    }

    #[test]
    fn test_multiple_layers() {
        let twice = latin1_garble(&latin1_garble("Größe"));
        let one = redecode_passes(&twice, 1);
        assert_eq!(one.text, latin1_garble("Größe"));
        assert_eq!(one.passes, 1);

        let three = redecode_passes(&twice, 3);
        assert_eq!(three.text, "Größe");
        assert_eq!(three.passes, 2);
        // Third cycle hit ö (0xF6), which is not valid UTF-8 on its own
        assert!(three.stopped_by.is_some());
    }

    #[test]
    fn test_ascii_stops_without_error() {
        let result = redecode_passes("plain", 3);
        assert_eq!(result.text, "plain");
        assert_eq!(result.passes, 0);
        assert_eq!(result.stopped_by, None);
    }

    #[test]
    fn test_pass_count_is_clamped() {
        let thrice = latin1_garble(&latin1_garble(&latin1_garble(&latin1_garble("ä"))));
        let result = redecode_passes(&thrice, 200);
        assert_eq!(result.passes, MAX_REDECODE_PASSES);
        assert_eq!(result.text, latin1_garble("ä"));

        let result = redecode_passes(&thrice, 0);
        assert_eq!(result.passes, 1);
    }
}
