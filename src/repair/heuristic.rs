// src/repair/heuristic.rs

//! Heuristic general text repair
//!
//! Replaces every detected mojibake sequence with the character it decodes
//! to, then looks again: text that was mis-decoded twice (`ÃƒÂ¤`) only
//! reveals its inner layer (`Ã¤`) after the first pass. There is no check
//! that the result is "better"; correct text that happens to look like
//! mojibake is changed too.

use std::borrow::Cow;

use super::detect::find_sequences;

/// Upper bound on repair passes (layers of compounded damage)
pub const MAX_HEURISTIC_PASSES: usize = 4;

/// Result of a heuristic repair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixed<'t> {
    pub text: Cow<'t, str>,
    /// Passes that changed something
    pub passes: usize,
    /// Sequences replaced across all passes
    pub repaired: usize,
}

/// Repair `text`, returning the borrowed input when nothing looked damaged
pub fn fix_text(text: &str) -> Cow<'_, str> {
    fix_text_counted(text).text
}

pub fn fix_text_counted(text: &str) -> Fixed<'_> {
    let mut current = Cow::Borrowed(text);
    let mut passes = 0;
    let mut repaired = 0;

    while passes < MAX_HEURISTIC_PASSES {
        let sequences = find_sequences(&current);
        if sequences.is_empty() {
            break;
        }

        let mut out = String::with_capacity(current.len());
        let mut last = 0;
        for seq in &sequences {
            out.push_str(&current[last..seq.range.start]);
            out.push(seq.repaired);
            last = seq.range.end;
        }
        out.push_str(&current[last..]);

        repaired += sequences.len();
        passes += 1;
        current = Cow::Owned(out);
    }

    Fixed {
        text: current,
        passes,
        repaired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SLOPPY_WINDOWS_1252;

    #[test]
    fn test_fixes_german() {
        assert_eq!(fix_text("GrÃ¶ÃŸe"), "Größe");
        assert_eq!(fix_text("LÃ¤dt Events ..."), "Lädt Events ...");
    }

    #[test]
    fn test_fixes_mixed_damage() {
        // Correct dash next to damaged umlaut
        assert_eq!(fix_text("Preis-Skala prÃ¼fen – jetzt"), "Preis-Skala prüfen – jetzt");
    }

    #[test]
    fn test_fixes_double_encoding() {
        let once = SLOPPY_WINDOWS_1252.garble("Größe");
        let twice = SLOPPY_WINDOWS_1252.garble(&once);
        let fixed = fix_text_counted(&twice);
        assert_eq!(fixed.text, "Größe");
        assert_eq!(fixed.passes, 2);
    }

    #[test]
    fn test_clean_text_borrowed() {
        let fixed = fix_text_counted("Größe – café");
        assert!(matches!(fixed.text, Cow::Borrowed(_)));
        assert_eq!(fixed.passes, 0);
        assert_eq!(fixed.repaired, 0);
    }

    #[test]
    fn test_idempotent_on_repaired_text() {
        let once = fix_text("Ãœbersicht â€ž Ã„nderungen â€œ").into_owned();
        assert_eq!(once, "Übersicht „ Änderungen “");
        assert_eq!(fix_text(&once), once);
    }

    #[test]
    fn test_pass_limit() {
        let mut text = "ä".to_string();
        for _ in 0..MAX_HEURISTIC_PASSES + 1 {
            text = SLOPPY_WINDOWS_1252.garble(&text);
        }
        let fixed = fix_text_counted(&text);
        assert_eq!(fixed.passes, MAX_HEURISTIC_PASSES);
        assert_eq!(fixed.text, SLOPPY_WINDOWS_1252.garble("ä"));
    }
}
