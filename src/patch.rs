// src/patch.rs

//! Exact snippet patches
//!
//! A patch is a list of hunks, each an exact expected snippet and its
//! replacement. Every hunk must match exactly once in the text as left by the
//! previous hunk, otherwise nothing is written. Matching is byte-exact: no
//! whitespace or line-ending normalization.

use thiserror::Error;

/// Why a patch could not be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("hunk {hunk}: expected snippet not found: {preview:?}")]
    NotFound { hunk: usize, preview: String },

    #[error("hunk {hunk}: expected snippet matches {count} times: {preview:?}")]
    Ambiguous {
        hunk: usize,
        count: usize,
        preview: String,
    },

    #[error("hunk {hunk}: expected snippet is empty")]
    EmptySnippet { hunk: usize },
}

/// One find/replace pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub find: String,
    pub replace: String,
}

impl Hunk {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

/// An all-or-nothing sequence of hunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetPatch {
    hunks: Vec<Hunk>,
}

/// First line of a snippet, shortened for error messages
fn preview(snippet: &str) -> String {
    const MAX: usize = 60;
    let first = snippet.lines().next().unwrap_or_default().trim();
    if first.chars().count() > MAX {
        let cut: String = first.chars().take(MAX).collect();
        format!("{}...", cut)
    } else {
        first.to_string()
    }
}

impl SnippetPatch {
    pub fn new(hunks: Vec<Hunk>) -> Self {
        Self { hunks }
    }

    pub fn single(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self::new(vec![Hunk::new(find, replace)])
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    /// Apply every hunk in order, or fail without producing any output
    ///
    /// Hunk numbers in errors are 1-based.
    pub fn apply(&self, text: &str) -> Result<String, PatchError> {
        let mut current = text.to_string();

        for (i, hunk) in self.hunks.iter().enumerate() {
            let number = i + 1;
            if hunk.find.is_empty() {
                return Err(PatchError::EmptySnippet { hunk: number });
            }

            match current.matches(hunk.find.as_str()).count() {
                0 => {
                    return Err(PatchError::NotFound {
                        hunk: number,
                        preview: preview(&hunk.find),
                    });
                }
                1 => current = current.replacen(hunk.find.as_str(), &hunk.replace, 1),
                count => {
                    return Err(PatchError::Ambiguous {
                        hunk: number,
                        count,
                        preview: preview(&hunk.find),
                    });
                }
            }
        }

        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "export default function Page() {\n  return (\n    <div className=\"a\">LÃ¤dt Events ...</div>\n  );\n}\n";

    #[test]
    fn test_single_occurrence_replaced() {
        let patch = SnippetPatch::single(
            "<div className=\"a\">LÃ¤dt Events ...</div>",
            "<div className=\"a\">{t(\"loading\")}</div>",
        );
        let out = patch.apply(PAGE).unwrap();
        assert_eq!(
            out,
            PAGE.replace("LÃ¤dt Events ...", "{t(\"loading\")}")
        );
        assert!(out.starts_with("export default function Page() {\n  return (\n"));
        assert!(out.ends_with("</div>\n  );\n}\n"));
    }

    #[test]
    fn test_not_found() {
        let patch = SnippetPatch::single("<span>missing</span>", "x");
        let err = patch.apply(PAGE).unwrap_err();
        assert_eq!(
            err,
            PatchError::NotFound {
                hunk: 1,
                preview: "<span>missing</span>".to_string()
            }
        );
    }

    #[test]
    fn test_already_applied_is_not_found() {
        let patch = SnippetPatch::single("LÃ¤dt", "Lädt");
        let once = patch.apply(PAGE).unwrap();
        assert!(matches!(
            patch.apply(&once),
            Err(PatchError::NotFound { hunk: 1, .. })
        ));
    }

    #[test]
    fn test_ambiguous() {
        let patch = SnippetPatch::single("</div>", "</section>");
        let text = "<div></div><div></div>";
        assert!(matches!(
            patch.apply(text),
            Err(PatchError::Ambiguous { hunk: 1, count: 2, .. })
        ));
    }

    #[test]
    fn test_later_hunk_failure_discards_earlier() {
        let patch = SnippetPatch::new(vec![
            Hunk::new("return (", "return ("),
            Hunk::new("never there", "x"),
        ]);
        assert!(matches!(
            patch.apply(PAGE),
            Err(PatchError::NotFound { hunk: 2, .. })
        ));
    }

    #[test]
    fn test_hunks_see_previous_results() {
        let patch = SnippetPatch::new(vec![Hunk::new("a", "b"), Hunk::new("bb", "c")]);
        assert_eq!(patch.apply("ab").unwrap(), "c");
    }

    #[test]
    fn test_multiline_snippet_with_crlf_does_not_match_lf() {
        let patch = SnippetPatch::single("  return (\n", "  return (\n    <>\n");
        assert!(patch.apply("  return (\r\n").is_err());
    }

    #[test]
    fn test_empty_snippet_rejected() {
        let patch = SnippetPatch::single("", "x");
        assert_eq!(
            patch.apply("abc").unwrap_err(),
            PatchError::EmptySnippet { hunk: 1 }
        );
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(100);
        assert_eq!(preview(&long).chars().count(), 63);
        assert_eq!(preview("first\nsecond"), "first");
    }
}
