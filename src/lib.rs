// src/lib.rs

//! Mojifix
//!
//! Repairs character-encoding corruption ("mojibake") in text assets such as
//! localization catalogs and UI sources, and applies exact snippet patches.
//!
//! # Architecture
//!
//! - Strategies: substitution tables, a detection heuristic, blind re-decode
//! - Plans: ordered repair steps over target files, from TOML or presets
//! - Targets: skip-if-missing reads, guarded atomic writes, dry-run diffs
//! - Patches: all-or-nothing exact snippet replacement, fatal on mismatch

pub mod codec;
mod error;
pub mod patch;
pub mod plan;
pub mod repair;
pub mod runner;
pub mod target;

pub use error::{Error, Result};
pub use patch::{Hunk, PatchError, SnippetPatch};
pub use plan::{load_plan, parse_plan, Action, Plan, PlanError, Preset, Step};
pub use repair::{
    ApplyOrder, BuiltinTable, Finding, Strategy, SubstitutionTable, MAX_HEURISTIC_PASSES,
    MAX_REDECODE_PASSES,
};
pub use runner::{run_plan, FileReport, RunOptions, RunReport};
pub use target::{FileOutcome, WriteOptions};
