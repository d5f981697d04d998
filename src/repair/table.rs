// src/repair/table.rs

//! Literal substitution-table repair
//!
//! A table is an ordered list of `(damaged, corrected)` pairs applied to the
//! raw text with no detection step. Keys that share a suffix make the result
//! depend on application order: with `["€“" => "\"", "â€“" => "–"]` applied in
//! declared order, `â€“` turns into `â"`. The default [`ApplyOrder::LongestFirst`]
//! compiles every key into one alternation sorted by descending length, so the
//! longest candidate at each position always wins.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

use crate::codec::SLOPPY_WINDOWS_1252;
use crate::error::{Error, Result};

/// Order in which table entries are applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyOrder {
    /// Single pass, longest key wins at each position
    #[default]
    LongestFirst,
    /// One full replace per entry, in the order the entries were declared
    Declared,
}

/// Built-in tables, generated from the characters they restore
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum BuiltinTable {
    German,
    Punctuation,
    Accents,
}

impl BuiltinTable {
    /// Characters whose UTF-8 -> Windows-1252 mojibake this table reverses
    pub fn chars(&self) -> &'static str {
        match self {
            Self::German => "äöüÄÖÜß",
            Self::Punctuation => "–—‘’‚“”„…•€°·§«»´\u{a0}",
            Self::Accents => "àáâãçèéêëìíîïñòóôõùúûýÿÀÁÂÃÇÈÉÊËÌÍÎÏÑÒÓÔÕÙÚÛÝ",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::German => "German umlauts and sharp s",
            Self::Punctuation => "Typographic quotes, dashes, ellipsis, euro, degree, no-break space",
            Self::Accents => "Western European accented letters",
        }
    }
}

/// An ordered substitution table
#[derive(Debug, Clone)]
pub struct SubstitutionTable {
    name: String,
    entries: Vec<(String, String)>,
    order: ApplyOrder,
    /// Compiled alternation, `None` for an empty table
    pattern: Option<Regex>,
    lookup: HashMap<String, String>,
}

impl SubstitutionTable {
    /// Build a table from declared entries
    ///
    /// Empty keys are rejected. When a key is declared twice the first
    /// correction wins in both orders.
    pub fn new(
        name: impl Into<String>,
        entries: Vec<(String, String)>,
        order: ApplyOrder,
    ) -> Result<Self> {
        let name = name.into();
        let mut lookup = HashMap::with_capacity(entries.len());
        let mut unique: Vec<(String, String)> = Vec::with_capacity(entries.len());

        for (damaged, corrected) in entries {
            if damaged.is_empty() {
                return Err(Error::InvalidTable {
                    name,
                    reason: format!("empty key (correction {:?})", corrected),
                });
            }
            if lookup.contains_key(&damaged) {
                debug!("Table '{}': ignoring duplicate key {:?}", name, damaged);
                continue;
            }
            lookup.insert(damaged.clone(), corrected.clone());
            unique.push((damaged, corrected));
        }

        let pattern = if unique.is_empty() {
            None
        } else {
            let mut keys: Vec<&str> = unique.iter().map(|(k, _)| k.as_str()).collect();
            // Stable sort keeps declared order among equal lengths
            keys.sort_by(|a, b| b.len().cmp(&a.len()));
            let alternation = keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation).map_err(|e| Error::InvalidTable {
                name: name.clone(),
                reason: e.to_string(),
            })?)
        };

        Ok(Self {
            name,
            entries: unique,
            order,
            pattern,
            lookup,
        })
    }

    /// Generate a table that reverses the sloppy Windows-1252 mojibake of
    /// each character in `chars`
    pub fn from_chars(name: impl Into<String>, chars: &str, order: ApplyOrder) -> Result<Self> {
        let entries = chars
            .chars()
            .filter(|c| !c.is_ascii())
            .map(|c| {
                let fixed = c.to_string();
                (SLOPPY_WINDOWS_1252.garble(&fixed), fixed)
            })
            .collect();
        Self::new(name, entries, order)
    }

    /// Build one of the built-in tables
    pub fn builtin(table: BuiltinTable, order: ApplyOrder) -> Result<Self> {
        Self::from_chars(table.as_ref(), table.chars(), order)
    }

    /// Look up a built-in table by name
    pub fn named(name: &str, order: ApplyOrder) -> Result<Self> {
        let table =
            BuiltinTable::from_str(name).map_err(|_| Error::UnknownTable(name.to_string()))?;
        Self::builtin(table, order)
    }

    /// Concatenate several tables into one, keeping their entry order
    pub fn combine(
        name: impl Into<String>,
        tables: impl IntoIterator<Item = SubstitutionTable>,
        order: ApplyOrder,
    ) -> Result<Self> {
        let entries = tables.into_iter().flat_map(|t| t.entries).collect();
        Self::new(name, entries, order)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn order(&self) -> ApplyOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the table, returning the borrowed input when nothing matched
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.apply_counted(text).0
    }

    /// Apply the table and report how many substitutions were made
    pub fn apply_counted<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        match self.order {
            ApplyOrder::LongestFirst => self.apply_longest_first(text),
            ApplyOrder::Declared => self.apply_declared(text),
        }
    }

    fn apply_longest_first<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let Some(pattern) = &self.pattern else {
            return (Cow::Borrowed(text), 0);
        };

        let mut count = 0;
        let replaced = pattern.replace_all(text, |caps: &Captures| {
            count += 1;
            self.lookup.get(&caps[0]).cloned().unwrap_or_default()
        });
        (replaced, count)
    }

    fn apply_declared<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let mut current = Cow::Borrowed(text);
        let mut count = 0;

        for (damaged, corrected) in &self.entries {
            let hits = current.matches(damaged.as_str()).count();
            if hits > 0 {
                count += hits;
                current = Cow::Owned(current.replace(damaged.as_str(), corrected));
            }
        }

        (current, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn table(entries: &[(&str, &str)], order: ApplyOrder) -> SubstitutionTable {
        let entries = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SubstitutionTable::new("test", entries, order).unwrap()
    }

    #[test]
    fn test_groesse() {
        let t = table(&[("Ã¶", "ö"), ("ÃŸ", "ß")], ApplyOrder::LongestFirst);
        assert_eq!(t.apply("GrÃ¶ÃŸe"), "Größe");

        let t = table(&[("Ã¶", "ö"), ("ÃŸ", "ß")], ApplyOrder::Declared);
        assert_eq!(t.apply("GrÃ¶ÃŸe"), "Größe");
    }

    #[test]
    fn test_suffix_hazard_in_declared_order() {
        let entries = [("€“", "\""), ("â€“", "–")];

        let declared = table(&entries, ApplyOrder::Declared);
        assert_eq!(declared.apply("a â€“ b"), "a â\" b");

        let longest = table(&entries, ApplyOrder::LongestFirst);
        assert_eq!(longest.apply("a â€“ b"), "a – b");
    }

    #[test]
    fn test_longest_first_ignores_authoring_order() {
        let forward = table(&[("â€“", "–"), ("€“", "\"")], ApplyOrder::LongestFirst);
        let reverse = table(&[("€“", "\""), ("â€“", "–")], ApplyOrder::LongestFirst);
        let input = "â€“ and €“";
        assert_eq!(forward.apply(input), reverse.apply(input));
        assert_eq!(forward.apply(input), "– and \"");
    }

    #[test]
    fn test_idempotent() {
        let t = SubstitutionTable::builtin(BuiltinTable::German, ApplyOrder::LongestFirst).unwrap();
        let once = t.apply("Ã„rger Ã¼ber StraÃŸe").into_owned();
        let twice = t.apply(&once).into_owned();
        assert_eq!(once, "Ärger über Straße");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_untouched_text_is_borrowed() {
        let t = table(&[("Ã¶", "ö")], ApplyOrder::LongestFirst);
        let (out, count) = t.apply_counted("Größe");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_counts_replacements() {
        let t = table(&[("Ã¶", "ö"), ("ÃŸ", "ß")], ApplyOrder::LongestFirst);
        assert_eq!(t.apply_counted("Ã¶Ã¶ÃŸ").1, 3);
        let t = table(&[("Ã¶", "ö"), ("ÃŸ", "ß")], ApplyOrder::Declared);
        assert_eq!(t.apply_counted("Ã¶Ã¶ÃŸ").1, 3);
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = SubstitutionTable::new(
            "bad",
            vec![(String::new(), "x".to_string())],
            ApplyOrder::LongestFirst,
        );
        assert!(matches!(result, Err(Error::InvalidTable { .. })));
    }

    #[test]
    fn test_duplicate_key_first_wins() {
        let t = table(&[("Ã¶", "ö"), ("Ã¶", "o")], ApplyOrder::LongestFirst);
        assert_eq!(t.len(), 1);
        assert_eq!(t.apply("Ã¶"), "ö");
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let t = table(&[("a.b", "X"), ("(", "[")], ApplyOrder::LongestFirst);
        assert_eq!(t.apply("a.b acb ("), "X acb [");
    }

    #[test]
    fn test_empty_table_is_noop() {
        let t = table(&[], ApplyOrder::LongestFirst);
        assert!(t.is_empty());
        assert_eq!(t.apply("Ã¶"), "Ã¶");
    }

    #[test]
    fn test_builtin_tables_by_name() {
        for builtin in BuiltinTable::iter() {
            let t = SubstitutionTable::named(builtin.as_ref(), ApplyOrder::LongestFirst).unwrap();
            assert_eq!(t.name(), builtin.as_ref());
            assert!(!t.is_empty());
        }
        assert!(matches!(
            SubstitutionTable::named("klingon", ApplyOrder::LongestFirst),
            Err(Error::UnknownTable(_))
        ));
    }

    #[test]
    fn test_punctuation_table() {
        let t = SubstitutionTable::builtin(BuiltinTable::Punctuation, ApplyOrder::LongestFirst)
            .unwrap();
        assert_eq!(t.apply("â€žHalloâ€œ â€“ 20Â°"), "„Hallo“ – 20°");
    }

    #[test]
    fn test_combine_keeps_all_entries() {
        let german =
            SubstitutionTable::builtin(BuiltinTable::German, ApplyOrder::LongestFirst).unwrap();
        let punct =
            SubstitutionTable::builtin(BuiltinTable::Punctuation, ApplyOrder::LongestFirst)
                .unwrap();
        let total = german.len() + punct.len();
        let combined =
            SubstitutionTable::combine("both", [german, punct], ApplyOrder::LongestFirst).unwrap();
        assert_eq!(combined.len(), total);
        assert_eq!(combined.apply("GrÃ¶ÃŸe â€“ Ã„"), "Größe – Ä");
    }
}
