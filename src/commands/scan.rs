// src/commands/scan.rs

//! Read-only mojibake report

use anyhow::{bail, Result};
use mojifix::repair::scan;
use mojifix::target::{read_target, resolve_targets};
use mojifix::Finding;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions scanned when a directory is given
const SCAN_EXTENSIONS: &[&str] = &["json", "ts", "tsx", "js", "jsx", "md", "html"];

#[derive(Serialize)]
struct FileFindings {
    path: PathBuf,
    findings: Vec<Finding>,
}

fn has_scan_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SCAN_EXTENSIONS.contains(&e))
}

/// Expand one argument into files: directories are walked, anything else
/// goes through the usual target resolution
fn expand(root: &Path, arg: &str) -> Result<Vec<PathBuf>> {
    let candidate = root.join(arg);
    if !candidate.is_dir() {
        return Ok(resolve_targets(root, arg)?);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(&candidate)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip dependency and VCS trees
            e.depth() == 0 || !(name.starts_with('.') || name == "node_modules")
        })
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && has_scan_extension(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    Ok(files)
}

pub fn cmd_scan(root: &str, paths: Vec<String>, json: bool) -> Result<()> {
    let root = Path::new(root);
    let args = super::targets_or_default(paths);

    let mut results = Vec::new();
    let mut errors = Vec::new();

    for arg in &args {
        for path in expand(root, arg)? {
            match read_target(&path) {
                Ok(Some(target)) => {
                    let findings = scan(&target.text);
                    if !findings.is_empty() {
                        results.push(FileFindings { path, findings });
                    }
                }
                Ok(None) => debug!("Skipping missing file: {}", path.display()),
                Err(e) => {
                    warn!("{}", e);
                    errors.push(e.to_string());
                }
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let total: usize = results.iter().map(|r| r.findings.len()).sum();
        for file in &results {
            for f in &file.findings {
                println!(
                    "{}:{}:{}: {} -> {}",
                    file.path.display(),
                    f.line,
                    f.column,
                    f.damaged.escape_debug(),
                    f.repaired
                );
            }
        }
        println!(
            "{} suspicious sequence(s) in {} file(s)",
            total,
            results.len()
        );
    }

    if !errors.is_empty() {
        bail!("{} file(s) could not be scanned", errors.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_walks_directories() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("messages")).unwrap();
        fs::create_dir_all(src.join("node_modules/pkg")).unwrap();
        fs::write(src.join("messages/de.json"), "{}").unwrap();
        fs::write(src.join("page.tsx"), "").unwrap();
        fs::write(src.join("image.png"), "").unwrap();
        fs::write(src.join("node_modules/pkg/index.js"), "").unwrap();

        let files = expand(dir.path(), "src").unwrap();
        assert_eq!(files, vec![src.join("messages/de.json"), src.join("page.tsx")]);
    }

    #[test]
    fn test_expand_single_file() {
        let dir = TempDir::new().unwrap();
        let files = expand(dir.path(), "missing.json").unwrap();
        assert_eq!(files, vec![dir.path().join("missing.json")]);
    }
}
