// src/plan/mod.rs

//! Repair plans
//!
//! A plan is an ordered list of steps, each applying one repair strategy or
//! snippet patch to a list of targets. It replaces a folder of one-shot
//! scripts that had to be run by hand in the right order.
//!
//! # Example plan.toml
//!
//! ```toml
//! [plan]
//! name = "locales"
//! description = "Repair the message catalogs, then patch the events page"
//!
//! # Built-in tables plus inline entries; inline keys override built-ins
//! [[step]]
//! strategy = "table"
//! tables = ["german", "punctuation"]
//! entries = [["Ã¢â‚¬â€œ", "–"]]
//! targets = ["src/messages/*.json"]
//!
//! [[step]]
//! strategy = "redecode"
//! passes = 3
//! targets = ["src/app/[locale]/events/page.tsx"]
//!
//! # Snippets can live next to the plan
//! [[step]]
//! strategy = "patch"
//! targets = ["src/components/Header.tsx"]
//!
//! [[step.hunks]]
//! find_file = "snippets/header-old.tsx"
//! replace_file = "snippets/header-new.tsx"
//! ```

pub mod parser;
mod presets;

pub use parser::{HunkConfig, PlanConfig, PlanFile, StepConfig, PLAN_VERSION};
pub use presets::{default_targets, Preset, EVENTS_PAGE, MESSAGE_CATALOGS};

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::patch::{Hunk, SnippetPatch};
use crate::repair::{Strategy, SubstitutionTable, MAX_REDECODE_PASSES};

/// Errors that can occur when loading a plan
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read plan file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse plan file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unsupported plan version: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Plan has no steps")]
    NoSteps,

    #[error("Step {step}: {reason}")]
    InvalidStep { step: usize, reason: String },

    #[error("Step {step}: failed to read snippet file {path}: {source}")]
    SnippetFile {
        step: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for plan operations
pub type PlanResult<T> = Result<T, PlanError>;

/// What a step does to each of its targets
#[derive(Debug, Clone)]
pub enum Action {
    Repair(Strategy),
    Patch(SnippetPatch),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repair(strategy) => write!(f, "{}", strategy),
            Self::Patch(patch) => write!(f, "patch:{}", patch.hunks().len()),
        }
    }
}

/// A validated step
#[derive(Debug, Clone)]
pub struct Step {
    pub action: Action,
    /// Target patterns, relative to the run root
    pub targets: Vec<String>,
}

/// A validated, ready-to-run plan
#[derive(Debug, Clone)]
pub struct Plan {
    pub name: String,
    pub description: Option<String>,
    pub verify_json: bool,
    pub steps: Vec<Step>,
}

impl Plan {
    /// Create an empty plan
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            verify_json: true,
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn with_step(mut self, action: Action, targets: Vec<String>) -> Self {
        self.steps.push(Step { action, targets });
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate a parsed plan file, loading snippet files relative to `base_dir`
    pub fn from_file(file: PlanFile, base_dir: &Path, default_name: &str) -> PlanResult<Self> {
        if file.config.version != PLAN_VERSION {
            return Err(PlanError::VersionMismatch {
                expected: PLAN_VERSION,
                found: file.config.version,
            });
        }
        if file.steps.is_empty() {
            return Err(PlanError::NoSteps);
        }

        let mut steps = Vec::with_capacity(file.steps.len());
        for (i, config) in file.steps.into_iter().enumerate() {
            steps.push(resolve_step(i + 1, config, base_dir)?);
        }

        Ok(Self {
            name: file.config.name.unwrap_or_else(|| default_name.to_string()),
            description: file.config.description,
            verify_json: file.config.verify_json,
            steps,
        })
    }
}

fn invalid(step: usize, reason: impl Into<String>) -> PlanError {
    PlanError::InvalidStep {
        step,
        reason: reason.into(),
    }
}

fn resolve_step(step: usize, config: StepConfig, base_dir: &Path) -> PlanResult<Step> {
    if config.targets().is_empty() {
        return Err(invalid(step, "no targets"));
    }
    if let Some(empty) = config.targets().iter().position(|t| t.trim().is_empty()) {
        return Err(invalid(step, format!("target {} is empty", empty + 1)));
    }

    let (action, targets) = match config {
        StepConfig::Table {
            targets,
            tables,
            table,
            entries,
            order,
        } => {
            let names: Vec<String> = table.into_iter().chain(tables).collect();
            if names.is_empty() && entries.is_empty() {
                return Err(invalid(step, "table step needs `table`, `tables` or `entries`"));
            }

            // Inline entries go first so they override built-in keys
            let mut parts = Vec::with_capacity(names.len() + 1);
            if !entries.is_empty() {
                parts.push(
                    SubstitutionTable::new("inline", entries, order)
                        .map_err(|e| invalid(step, e.to_string()))?,
                );
            }
            for name in &names {
                parts.push(
                    SubstitutionTable::named(name, order).map_err(|e| invalid(step, e.to_string()))?,
                );
            }

            let label = if names.is_empty() {
                "inline".to_string()
            } else {
                names.join("+")
            };
            let combined = SubstitutionTable::combine(label, parts, order)
                .map_err(|e| invalid(step, e.to_string()))?;
            (Action::Repair(Strategy::Table(combined)), targets)
        }
        StepConfig::Heuristic { targets } => (Action::Repair(Strategy::Heuristic), targets),
        StepConfig::Redecode { targets, passes } => {
            if !(1..=MAX_REDECODE_PASSES).contains(&passes) {
                return Err(invalid(
                    step,
                    format!("passes must be between 1 and {}, got {}", MAX_REDECODE_PASSES, passes),
                ));
            }
            (Action::Repair(Strategy::Redecode { passes }), targets)
        }
        StepConfig::Patch { targets, hunks } => {
            if hunks.is_empty() {
                return Err(invalid(step, "patch step has no hunks"));
            }
            let hunks = hunks
                .into_iter()
                .enumerate()
                .map(|(i, hunk)| resolve_hunk(step, i + 1, hunk, base_dir))
                .collect::<PlanResult<Vec<_>>>()?;
            (Action::Patch(SnippetPatch::new(hunks)), targets)
        }
    };

    debug!("Step {}: {} on {} target(s)", step, action, targets.len());
    Ok(Step { action, targets })
}

fn snippet(
    step: usize,
    hunk: usize,
    field: &str,
    inline: Option<String>,
    file: Option<String>,
    base_dir: &Path,
) -> PlanResult<String> {
    match (inline, file) {
        (Some(text), None) => Ok(text),
        (None, Some(file)) => {
            let path = base_dir.join(file);
            std::fs::read_to_string(&path).map_err(|source| PlanError::SnippetFile {
                step,
                path,
                source,
            })
        }
        (Some(_), Some(_)) => Err(invalid(
            step,
            format!("hunk {}: set either `{}` or `{}_file`, not both", hunk, field, field),
        )),
        (None, None) => Err(invalid(
            step,
            format!("hunk {}: missing `{}` or `{}_file`", hunk, field, field),
        )),
    }
}

fn resolve_hunk(step: usize, number: usize, hunk: HunkConfig, base_dir: &Path) -> PlanResult<Hunk> {
    let find = snippet(step, number, "find", hunk.find, hunk.find_file, base_dir)?;
    if find.is_empty() {
        return Err(invalid(step, format!("hunk {}: `find` is empty", number)));
    }
    let replace = snippet(step, number, "replace", hunk.replace, hunk.replace_file, base_dir)?;
    Ok(Hunk::new(find, replace))
}

/// Parse and validate plan text; relative snippet files resolve against `base_dir`
pub fn parse_plan(contents: &str, base_dir: &Path, default_name: &str) -> PlanResult<Plan> {
    let file: PlanFile = toml::from_str(contents)?;
    Plan::from_file(file, base_dir, default_name)
}

/// Load a plan file from disk
pub fn load_plan(path: &Path) -> PlanResult<Plan> {
    let contents = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let default_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("plan");
    parse_plan(&contents, base_dir, default_name)
}
