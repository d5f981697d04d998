// src/plan/parser.rs

//! Serde types for plan TOML files.

use serde::{Deserialize, Serialize};

use crate::repair::ApplyOrder;

/// Current plan file version
pub const PLAN_VERSION: u32 = 1;

/// A plan file as written on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFile {
    /// Plan metadata
    #[serde(rename = "plan", default)]
    pub config: PlanConfig,

    /// Steps, executed in order
    #[serde(rename = "step", default)]
    pub steps: Vec<StepConfig>,
}

/// `[plan]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Plan file version (for forward compatibility)
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Refuse writes that break a parseable `.json` target
    #[serde(default = "default_true")]
    pub verify_json: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            version: PLAN_VERSION,
            name: None,
            description: None,
            verify_json: true,
        }
    }
}

fn default_version() -> u32 {
    PLAN_VERSION
}

fn default_true() -> bool {
    true
}

fn default_passes() -> u8 {
    1
}

/// One `[[step]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum StepConfig {
    Table {
        targets: Vec<String>,
        /// Built-in table names, combined in order
        #[serde(default)]
        tables: Vec<String>,
        /// Single built-in table name (shorthand for `tables = [name]`)
        #[serde(default)]
        table: Option<String>,
        /// Inline `[damaged, corrected]` pairs; they override built-in keys
        #[serde(default)]
        entries: Vec<(String, String)>,
        #[serde(default)]
        order: ApplyOrder,
    },
    Heuristic {
        targets: Vec<String>,
    },
    Redecode {
        targets: Vec<String>,
        #[serde(default = "default_passes")]
        passes: u8,
    },
    Patch {
        targets: Vec<String>,
        hunks: Vec<HunkConfig>,
    },
}

impl StepConfig {
    pub fn targets(&self) -> &[String] {
        match self {
            Self::Table { targets, .. }
            | Self::Heuristic { targets }
            | Self::Redecode { targets, .. }
            | Self::Patch { targets, .. } => targets,
        }
    }
}

/// One `[[step.hunks]]` entry; snippets inline or in files next to the plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HunkConfig {
    #[serde(default)]
    pub find: Option<String>,
    #[serde(default)]
    pub find_file: Option<String>,
    #[serde(default)]
    pub replace: Option<String>,
    #[serde(default)]
    pub replace_file: Option<String>,
}
