// src/commands/mod.rs
//! Command handlers for the mojifix CLI

mod plan;
mod repair;
mod scan;
mod tables;

// Re-export all command handlers
pub use plan::{cmd_presets, cmd_run};
pub use repair::{cmd_heuristic, cmd_patch, cmd_redecode, cmd_table};
pub use scan::cmd_scan;
pub use tables::cmd_tables;

use anyhow::{bail, Result};
use mojifix::{run_plan, Plan, RunOptions, RunReport};
use std::path::Path;

use crate::cli::WriteArgs;

/// Use the given targets, or the legacy defaults when none were given
fn targets_or_default(files: Vec<String>) -> Vec<String> {
    if files.is_empty() {
        mojifix::plan::default_targets()
    } else {
        files
    }
}

/// Run a plan, print dry-run diffs, and turn per-file failures into an error
fn execute(plan: &Plan, root: &str, write: WriteArgs) -> Result<RunReport> {
    let options = RunOptions {
        root: Path::new(root).to_path_buf(),
        dry_run: write.dry_run,
        verify_json: !write.no_verify_json,
    };
    let report = run_plan(plan, &options)?;

    if write.dry_run {
        for file in report.repaired() {
            println!("=== {} (step {}: {})", file.path.display(), file.step, file.action);
            if let Some(diff) = &file.diff {
                print!("{}", diff);
            }
        }
        println!("Dry run: {}", report.summary());
    }

    check_failures(&report)?;
    Ok(report)
}

fn check_failures(report: &RunReport) -> Result<()> {
    let failures: Vec<String> = report
        .failures()
        .map(|f| format!("  {}: {}", f.path.display(), reason(&f.outcome)))
        .collect();
    if failures.is_empty() {
        return Ok(());
    }
    bail!(
        "{} file(s) could not be repaired:\n{}",
        failures.len(),
        failures.join("\n")
    )
}

fn reason(outcome: &mojifix::FileOutcome) -> &str {
    match outcome {
        mojifix::FileOutcome::Rejected { reason } | mojifix::FileOutcome::Failed { reason } => {
            reason
        }
        _ => "",
    }
}
