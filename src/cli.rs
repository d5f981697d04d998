// src/cli.rs
//! CLI definitions for mojifix
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use mojifix::MAX_REDECODE_PASSES;

#[derive(Parser)]
#[command(name = "mojifix")]
#[command(author = "Mojifix Contributors")]
#[command(version)]
#[command(about = "Repair mojibake in localization files and UI sources", long_about = None)]
pub struct Cli {
    /// Project root that target paths are relative to
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub root: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags shared by every command that rewrites files
#[derive(Args, Debug, Clone, Copy)]
pub struct WriteArgs {
    /// Show a diff of what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Allow writes that leave a .json file unparseable
    #[arg(long)]
    pub no_verify_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply substitution tables (default: the german table)
    Table {
        /// Files or glob patterns (default: message catalogs and events page)
        files: Vec<String>,

        /// Built-in table to apply; repeat to combine tables
        #[arg(short, long = "table", value_name = "NAME")]
        tables: Vec<String>,

        /// Extra substitution, e.g. --entry 'Ã¶=ö'; repeatable
        #[arg(short, long = "entry", value_name = "DAMAGED=FIXED")]
        entries: Vec<String>,

        /// Apply entries one by one in declared order instead of longest-first
        #[arg(long)]
        declared_order: bool,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Detect and decode UTF-8-as-Windows-1252 sequences
    Heuristic {
        /// Files or glob patterns (default: message catalogs and events page)
        files: Vec<String>,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Re-decode each file's Latin-1 bytes as UTF-8, keeping it unchanged on failure
    Redecode {
        /// Files or glob patterns (default: message catalogs and events page)
        files: Vec<String>,

        /// Number of cycles to attempt
        #[arg(short, long, default_value_t = 1,
              value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_REDECODE_PASSES)))]
        passes: u8,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Replace an exact snippet in a file; fails without writing if it is not found exactly once
    Patch {
        /// File to patch
        file: String,

        /// File holding the exact text expected in FILE
        #[arg(long, value_name = "PATH")]
        find_file: String,

        /// File holding the replacement text
        #[arg(long, value_name = "PATH")]
        replace_file: String,

        /// Show the diff without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a plan file or a built-in preset
    Run {
        /// Path to a plan TOML file
        #[arg(required_unless_present = "preset")]
        plan: Option<String>,

        /// Built-in preset to run instead of a plan file
        #[arg(short, long, conflicts_with = "plan")]
        preset: Option<String>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// List built-in presets
    Presets,

    /// List built-in substitution tables
    Tables {
        /// Print every entry of the named table
        #[arg(long, value_name = "NAME")]
        show: Option<String>,
    },

    /// Report suspected mojibake without changing anything
    Scan {
        /// Files, directories or glob patterns (default: message catalogs and events page)
        paths: Vec<String>,

        /// Output findings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
