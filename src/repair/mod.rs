// src/repair/mod.rs

//! Text repair strategies
//!
//! Three ways of undoing mojibake, from most to least predictable:
//!
//! - [`table`]: literal substitution of known damaged sequences
//! - [`heuristic`]: detect UTF-8-as-Windows-1252 runs and decode them
//! - [`redecode`]: reinterpret the whole text's Latin-1 bytes as UTF-8
//!
//! [`detect`] is shared by the heuristic and by `mojifix scan`.

pub mod detect;
pub mod heuristic;
pub mod redecode;
pub mod table;

use std::borrow::Cow;
use std::fmt;

pub use detect::{find_sequences, scan, score, Finding};
pub use heuristic::{fix_text, MAX_HEURISTIC_PASSES};
pub use redecode::{redecode, redecode_passes, Redecoded, MAX_REDECODE_PASSES};
pub use table::{ApplyOrder, BuiltinTable, SubstitutionTable};

/// A configured repair strategy
#[derive(Debug, Clone)]
pub enum Strategy {
    Table(SubstitutionTable),
    Heuristic,
    Redecode { passes: u8 },
}

/// Result of applying a strategy to one text
#[derive(Debug, Clone)]
pub struct Repaired<'t> {
    pub text: Cow<'t, str>,
    /// Substitutions, sequences or cycles applied, depending on strategy
    pub edits: usize,
    /// Why a re-decode stopped early, if it did
    pub note: Option<String>,
}

impl Repaired<'_> {
    pub fn changed(&self) -> bool {
        matches!(self.text, Cow::Owned(_))
    }
}

impl Strategy {
    pub fn repair<'t>(&self, text: &'t str) -> Repaired<'t> {
        match self {
            Self::Table(table) => {
                let (text, edits) = table.apply_counted(text);
                Repaired {
                    text,
                    edits,
                    note: None,
                }
            }
            Self::Heuristic => {
                let fixed = heuristic::fix_text_counted(text);
                Repaired {
                    text: fixed.text,
                    edits: fixed.repaired,
                    note: None,
                }
            }
            Self::Redecode { passes } => {
                let result = redecode_passes(text, *passes);
                let note = result.stopped_by.map(|e| e.to_string());
                let text = if result.passes == 0 {
                    Cow::Borrowed(text)
                } else {
                    Cow::Owned(result.text)
                };
                Repaired {
                    text,
                    edits: usize::from(result.passes),
                    note,
                }
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => write!(f, "table:{}", table.name()),
            Self::Heuristic => write!(f, "heuristic"),
            Self::Redecode { passes } => write!(f, "redecode:{}", passes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies_on_same_input() {
        let german = SubstitutionTable::builtin(BuiltinTable::German, ApplyOrder::LongestFirst)
            .unwrap();
        let input = "GrÃ¶ÃŸe";

        let table = Strategy::Table(german).repair(input);
        assert_eq!(table.text, "Größe");
        assert_eq!(table.edits, 2);
        assert!(table.changed());

        let heuristic = Strategy::Heuristic.repair(input);
        assert_eq!(heuristic.text, "Größe");
        assert_eq!(heuristic.edits, 2);

        // Ÿ has no Latin-1 byte: the blind re-decode refuses
        let redecode = Strategy::Redecode { passes: 1 }.repair(input);
        assert_eq!(redecode.text, input);
        assert!(!redecode.changed());
        assert!(redecode.note.is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(Strategy::Heuristic.to_string(), "heuristic");
        assert_eq!(Strategy::Redecode { passes: 3 }.to_string(), "redecode:3");
        let t = SubstitutionTable::named("german", ApplyOrder::Declared).unwrap();
        assert_eq!(Strategy::Table(t).to_string(), "table:german");
    }
}
