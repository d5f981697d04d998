// src/error.rs

//! Crate-wide error type

use std::path::PathBuf;
use thiserror::Error;

use crate::patch::PatchError;
use crate::plan::PlanError;

/// Errors surfaced by mojifix library operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading or writing a target
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target content is not UTF-8
    #[error("{path} is not valid UTF-8 (first invalid byte at offset {offset})")]
    NotUtf8 { path: PathBuf, offset: usize },

    /// Snippet patch precondition failed
    #[error("Patch failed for {path}: {source}")]
    Patch {
        path: PathBuf,
        #[source]
        source: PatchError,
    },

    /// Plan could not be loaded or validated
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Substitution table could not be compiled
    #[error("Invalid substitution table '{name}': {reason}")]
    InvalidTable { name: String, reason: String },

    /// Unknown built-in table name
    #[error("Unknown substitution table '{0}'")]
    UnknownTable(String),

    /// Target pattern is not a valid glob
    #[error("Invalid target pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for mojifix operations
pub type Result<T> = std::result::Result<T, Error>;
