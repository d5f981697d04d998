// src/commands/plan.rs

//! Plan and preset commands

use anyhow::{anyhow, Context, Result};
use mojifix::{load_plan, run_plan, Preset, RunOptions};
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::info;

use super::{check_failures, execute};
use crate::cli::WriteArgs;

pub fn cmd_run(
    root: &str,
    plan_path: Option<&str>,
    preset: Option<&str>,
    json: bool,
    write: WriteArgs,
) -> Result<()> {
    let plan = match (plan_path, preset) {
        (_, Some(name)) => Preset::from_str(name)
            .map_err(|_| {
                anyhow!(
                    "Unknown preset '{}'. Run 'mojifix presets' to list them",
                    name
                )
            })?
            .plan()?,
        (Some(path), None) => {
            load_plan(Path::new(path)).with_context(|| format!("Failed to load plan {}", path))?
        }
        (None, None) => return Err(anyhow!("Either a plan file or --preset is required")),
    };

    info!(
        "Loaded plan '{}': {}",
        plan.name,
        plan.description.as_deref().unwrap_or("(no description)")
    );

    if !json {
        execute(&plan, root, write)?;
        return Ok(());
    }

    let options = RunOptions {
        root: Path::new(root).to_path_buf(),
        dry_run: write.dry_run,
        verify_json: !write.no_verify_json,
    };
    let report = run_plan(&plan, &options)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    check_failures(&report)
}

pub fn cmd_presets() -> Result<()> {
    println!("Built-in presets:");
    for preset in Preset::iter() {
        let plan = preset.plan()?;
        println!("  {:<14} {}", preset.as_ref(), preset.description());
        for step in &plan.steps {
            println!("  {:<14}   {} -> {}", "", step.action, step.targets.join(", "));
        }
    }
    Ok(())
}
