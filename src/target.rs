// src/target.rs

//! Target file I/O
//!
//! Read a file, hand its text to a transform, and write the result back.
//! Missing files are skipped, unchanged text is never written, and writes go
//! through a temporary file in the same directory followed by a rename, so a
//! crash mid-write leaves either the old or the new content.

use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

const UTF8_BOM: &str = "\u{feff}";

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileOutcome {
    /// The file does not exist; nothing was done
    Missing,
    /// The transform produced identical text; nothing was written
    Unchanged,
    /// New content was written (or would be, in a dry run)
    Repaired {
        bytes_before: usize,
        bytes_after: usize,
    },
    /// A guard refused the new content; the file was left as it was
    Rejected { reason: String },
    /// An error prevented processing; the file was left as it was
    Failed { reason: String },
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Failed { .. })
    }
}

/// Options shared by every rewrite in a run
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Compute outcomes and diffs but leave files alone
    pub dry_run: bool,
    /// Refuse to turn a parseable `.json` file into an unparseable one
    pub verify_json: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            verify_json: true,
        }
    }
}

/// Text of a target with its BOM split off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetText {
    pub text: String,
    pub bom: bool,
}

impl TargetText {
    fn into_bytes_with(self, new_text: &str) -> Vec<u8> {
        let mut out = String::with_capacity(new_text.len() + UTF8_BOM.len());
        if self.bom {
            out.push_str(UTF8_BOM);
        }
        out.push_str(new_text);
        out.into_bytes()
    }
}

/// Read a target as UTF-8; `Ok(None)` when it does not exist
pub fn read_target(path: &Path) -> Result<Option<TargetText>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };

    let text = String::from_utf8(bytes).map_err(|e| Error::NotUtf8 {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })?;

    Ok(Some(match text.strip_prefix(UTF8_BOM) {
        Some(rest) => TargetText {
            text: rest.to_string(),
            bom: true,
        },
        None => TargetText { text, bom: false },
    }))
}

/// Replace `path` with `content` via a same-directory temp file and rename
///
/// Permissions of an existing file are carried over.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    temp.write_all(content).map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::io(temp.path(), e))?;

    if let Ok(meta) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| Error::io(path, e))?;
    }

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Reason to refuse `after`, if a parseable JSON document stopped parsing
fn json_regression(before: &str, after: &str) -> Option<String> {
    if serde_json::from_str::<serde_json::Value>(before).is_err() {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(after)
        .err()
        .map(|e| format!("repaired text is no longer valid JSON: {}", e))
}

/// Result of one rewrite
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub outcome: FileOutcome,
    /// Unified diff, produced only for dry runs of changed files
    pub diff: Option<String>,
}

impl Rewrite {
    fn outcome(outcome: FileOutcome) -> Self {
        Self {
            outcome,
            diff: None,
        }
    }
}

/// Read `path`, transform it, and write back if the text changed
///
/// Errors from reading or from the transform are returned unchanged so the
/// caller can decide whether they are fatal; the file is untouched in that
/// case.
pub fn rewrite<F>(path: &Path, options: WriteOptions, transform: F) -> Result<Rewrite>
where
    F: for<'a> FnOnce(&'a str) -> Result<Cow<'a, str>>,
{
    let Some(target) = read_target(path)? else {
        debug!("Skipping missing file: {}", path.display());
        return Ok(Rewrite::outcome(FileOutcome::Missing));
    };

    let new_text = transform(&target.text)?.into_owned();
    if new_text == target.text {
        debug!("No changes for {}", path.display());
        return Ok(Rewrite::outcome(FileOutcome::Unchanged));
    }

    if options.verify_json && is_json(path) {
        if let Some(reason) = json_regression(&target.text, &new_text) {
            warn!("Refusing to write {}: {}", path.display(), reason);
            return Ok(Rewrite::outcome(FileOutcome::Rejected { reason }));
        }
    }

    let bytes_before = target.text.len() + if target.bom { UTF8_BOM.len() } else { 0 };
    let diff = options
        .dry_run
        .then(|| diffy::create_patch(&target.text, &new_text).to_string());
    let content = target.into_bytes_with(&new_text);
    let outcome = FileOutcome::Repaired {
        bytes_before,
        bytes_after: content.len(),
    };

    if options.dry_run {
        info!("Would rewrite {} (dry run)", path.display());
    } else {
        write_atomic(path, &content)?;
        info!("Rewrote {}", path.display());
    }

    Ok(Rewrite { outcome, diff })
}

/// Escape `[` and `]` so bracketed path segments never act as a class
fn escape_brackets(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '[' => out.push_str("[[]"),
            ']' => out.push_str("[]]"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolve a target pattern against `root`
///
/// Only `*` and `?` expand. Brackets are always literal, so UI paths like
/// `src/app/[locale]/page.tsx` never match a sibling such as `src/app/e/`,
/// and the root itself is escaped before it becomes part of a glob. A
/// pattern without wildcards, or one that matches nothing, resolves to the
/// literal path and is later reported as missing.
pub fn resolve_targets(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let literal = root.join(pattern);
    if literal.exists() || !pattern.contains(['*', '?']) {
        return Ok(vec![literal]);
    }

    let full = if Path::new(pattern).is_absolute() {
        escape_brackets(pattern)
    } else {
        format!(
            "{}{}{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            std::path::MAIN_SEPARATOR,
            escape_brackets(pattern)
        )
    };
    let entries = glob::glob(&full).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!("Cannot read {}: {}", e.path().display(), e);
                None
            }
        })
        .collect();
    matches.sort();

    if matches.is_empty() {
        debug!("Pattern '{}' matched nothing", pattern);
        matches.push(literal);
    }
    Ok(matches)
}
