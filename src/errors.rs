// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid job '{job}': {reason}")]
    InvalidJob { job: String, reason: String },

    #[error("Duplicate job id: {0}")]
    DuplicateJob(String),

    #[error("Dependency {parent} -> {child} references unknown job '{missing}'")]
    UnknownJob {
        parent: String,
        child: String,
        missing: String,
    },

    #[error("Job '{0}' cannot depend on itself")]
    SelfLoop(String),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    /// The simulation ran out of runnable jobs before every job completed.
    #[error("Simulation stalled with unfinished jobs: {}", .stuck.join(", "))]
    SimulationStalled { stuck: Vec<String> },

    /// A fusion stage produced a graph that no longer matches its job set.
    #[error("Graph integrity error: {0}")]
    Integrity(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ManifestError>;
