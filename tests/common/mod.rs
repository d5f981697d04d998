// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use mojifix::plan::{EVENTS_PAGE, MESSAGE_CATALOGS};
use mojifix::RunOptions;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// German catalog with umlaut mojibake, as found in the web app
pub const DE_JSON: &str = r#"{
  "events": {
    "loading": "LÃ¤dt Events...",
    "empty": "Keine Events gefunden",
    "size": "GrÃ¶ÃŸe",
    "filter": "FÃ¼r Mitglieder"
  }
}
"#;

pub const DE_JSON_FIXED: &str = r#"{
  "events": {
    "loading": "Lädt Events...",
    "empty": "Keine Events gefunden",
    "size": "Größe",
    "filter": "Für Mitglieder"
  }
}
"#;

/// English catalog, already clean
pub const EN_JSON: &str = r#"{
  "events": {
    "loading": "Loading events...",
    "empty": "No events found"
  }
}
"#;

pub const EVENTS_TSX: &str = r#"export default function EventsPage() {
  return <p className="loading">LÃ¤dt Events...</p>;
}
"#;

/// Create a project tree with both catalogs and the events page.
///
/// Returns the TempDir; keep it alive to prevent cleanup.
pub fn setup_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), MESSAGE_CATALOGS[0], DE_JSON);
    write(dir.path(), MESSAGE_CATALOGS[1], EN_JSON);
    write(dir.path(), EVENTS_PAGE, EVENTS_TSX);
    dir
}

/// Write `content` to `rel` under `root`, creating parent directories
pub fn write(root: &Path, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

pub fn options(root: &Path) -> RunOptions {
    RunOptions {
        root: root.to_path_buf(),
        ..RunOptions::default()
    }
}

pub fn dry_run(root: &Path) -> RunOptions {
    RunOptions {
        dry_run: true,
        ..options(root)
    }
}
