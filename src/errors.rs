// src/errors.rs

//! Crate-wide error type and result alias.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single watched file for which the validator exited non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationFailure {
    pub file: PathBuf,
    pub exit_code: i32,
}

impl fmt::Display for InvocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (exit {})", self.file.display(), self.exit_code)
    }
}

#[derive(Error, Debug)]
pub enum WffError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("Malformed manifest {path:?}: {reason}")]
    MalformedDescriptor { path: PathBuf, reason: String },

    #[error("Could not acquire {tool} from {url}: {reason}")]
    ToolAcquisition {
        tool: String,
        url: String,
        reason: String,
    },

    #[error(
        "validation failed for {} file(s): {} (see {record:?})",
        failures.len(),
        join_failures(failures)
    )]
    ValidationFailed {
        failures: Vec<InvocationFailure>,
        record: PathBuf,
    },

    #[error("{tool} exited with status {exit_code}: {detail}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        detail: String,
    },

    #[error("command for task '{task}' exited with status {exit_code}")]
    CommandFailed { task: String, exit_code: i32 },

    #[error("No APK found in {0:?}")]
    ApkNotFound(PathBuf),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_failures(failures: &[InvocationFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WffError>;
