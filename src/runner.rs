// src/runner.rs

//! Plan execution
//!
//! Steps run in order; within a step, targets run in order. A failure on one
//! file is recorded and the next file is still attempted, except for patch
//! precondition failures, which stop the whole run before anything else is
//! written.

use serde::Serialize;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::plan::{Action, Plan};
use crate::target::{resolve_targets, rewrite, FileOutcome, WriteOptions};

/// Options for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory target patterns are resolved against
    pub root: PathBuf,
    pub dry_run: bool,
    /// JSON guard; also requires the plan to allow it
    pub verify_json: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            dry_run: false,
            verify_json: true,
        }
    }
}

/// Outcome for one target of one step
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// 1-based step number
    pub step: usize,
    pub action: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Everything a run did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub plan: String,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.outcome.is_failure())
    }

    pub fn repaired(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Repaired { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// One-line tally, e.g. "2 repaired, 1 unchanged, 1 missing, 0 failed"
    pub fn summary(&self) -> String {
        let count = |pred: fn(&FileOutcome) -> bool| {
            self.files.iter().filter(|f| pred(&f.outcome)).count()
        };
        format!(
            "{} repaired, {} unchanged, {} missing, {} failed",
            count(|o| matches!(o, FileOutcome::Repaired { .. })),
            count(|o| matches!(o, FileOutcome::Unchanged)),
            count(|o| matches!(o, FileOutcome::Missing)),
            count(FileOutcome::is_failure),
        )
    }
}

/// Execute `plan` against the files under `options.root`
///
/// Returns `Err` only for fatal conditions: a patch whose expected snippet
/// is missing or ambiguous, or an invalid target pattern.
pub fn run_plan(plan: &Plan, options: &RunOptions) -> Result<RunReport> {
    let write_options = WriteOptions {
        dry_run: options.dry_run,
        verify_json: options.verify_json && plan.verify_json,
    };
    let mut files = Vec::new();

    info!(
        "Running plan '{}' ({} step(s)){}",
        plan.name,
        plan.steps.len(),
        if options.dry_run { " [dry run]" } else { "" }
    );

    for (i, step) in plan.steps.iter().enumerate() {
        let number = i + 1;
        let action = step.action.to_string();
        debug!("Step {}: {}", number, action);

        for pattern in &step.targets {
            for path in resolve_targets(&options.root, pattern)? {
                let result = match &step.action {
                    Action::Repair(strategy) => rewrite(&path, write_options, |text| {
                        let repaired = strategy.repair(text);
                        if let Some(note) = &repaired.note {
                            debug!("{} on {}: stopped early: {}", strategy, path.display(), note);
                        }
                        Ok(repaired.text)
                    }),
                    Action::Patch(patch) => rewrite(&path, write_options, |text| {
                        patch
                            .apply(text)
                            .map(Cow::Owned)
                            .map_err(|source| Error::Patch {
                                path: path.clone(),
                                source,
                            })
                    }),
                };

                let (outcome, diff) = match result {
                    Ok(rw) => (rw.outcome, rw.diff),
                    Err(e @ Error::Patch { .. }) => {
                        error!("Aborting plan '{}': {}", plan.name, e);
                        return Err(e);
                    }
                    Err(e) => {
                        warn!("Failed to process {}: {}", path.display(), e);
                        (
                            FileOutcome::Failed {
                                reason: e.to_string(),
                            },
                            None,
                        )
                    }
                };

                files.push(FileReport {
                    step: number,
                    action: action.clone(),
                    path,
                    outcome,
                    diff,
                });
            }
        }
    }

    let report = RunReport {
        plan: plan.name.clone(),
        dry_run: options.dry_run,
        files,
    };
    info!("Plan '{}' finished: {}", report.plan, report.summary());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::SnippetPatch;
    use crate::repair::Strategy;
    use std::fs;
    use tempfile::TempDir;

    fn options(root: &std::path::Path) -> RunOptions {
        RunOptions {
            root: root.to_path_buf(),
            ..RunOptions::default()
        }
    }

    #[test]
    fn test_failure_on_one_file_does_not_stop_the_next() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.txt"), [0xFF, 0xFE, 0x00]).unwrap();
        fs::write(dir.path().join("good.txt"), "GrÃ¶ÃŸe").unwrap();

        let plan = Plan::new("mixed").with_step(
            Action::Repair(Strategy::Heuristic),
            vec!["bad.txt".to_string(), "good.txt".to_string()],
        );
        let report = run_plan(&plan, &options(dir.path())).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.repaired().count(), 1);
        assert_eq!(fs::read_to_string(dir.path().join("good.txt")).unwrap(), "Größe");
        assert_eq!(report.summary(), "1 repaired, 0 unchanged, 0 missing, 1 failed");
    }

    #[test]
    fn test_patch_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.tsx"), "one").unwrap();
        fs::write(dir.path().join("b.tsx"), "two").unwrap();

        let plan = Plan::new("patch").with_step(
            Action::Patch(SnippetPatch::single("one", "1")),
            vec!["b.tsx".to_string(), "a.tsx".to_string()],
        );
        let err = run_plan(&plan, &options(dir.path())).unwrap_err();
        assert!(matches!(err, Error::Patch { .. }));
        assert_eq!(fs::read_to_string(dir.path().join("a.tsx")).unwrap(), "one");
        assert_eq!(fs::read_to_string(dir.path().join("b.tsx")).unwrap(), "two");
    }

    #[test]
    fn test_report_serializes_flat() {
        let dir = TempDir::new().unwrap();
        let plan = Plan::new("json")
            .with_step(Action::Repair(Strategy::Heuristic), vec!["none.json".to_string()]);
        let report = run_plan(&plan, &options(dir.path())).unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["plan"], "json");
        assert_eq!(value["files"][0]["status"], "missing");
        assert_eq!(value["files"][0]["action"], "heuristic");
        assert!(value["files"][0].get("diff").is_none());
    }
}
