// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::dag::{Job, Workflow};
use crate::types::Seconds;

/// Top-level workflow description as read from a TOML or JSON file.
///
/// ```toml
/// [convert]
/// groups = ["SWAN Inner North", "adcirc:256"]
/// max_cores = 0
///
/// [[job]]
/// id = "ID0001"
/// name = "sin"
/// runtime = 14400
/// cores = 160
///
/// [deps]
/// ID0001 = ["ID0002"]
/// ```
///
/// Only `[[job]]` is required. This is the unvalidated form; turn it into a
/// [`WorkflowFile`] with `WorkflowFile::try_from`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowFile {
    /// Conversion settings from `[convert]`.
    #[serde(default)]
    pub convert: ConvertSection,

    /// Jobs in their original order.
    #[serde(default, rename = "job", alias = "jobs")]
    pub jobs: Vec<JobConfig>,

    /// Parent id -> ids of the jobs that wait for it.
    #[serde(default)]
    pub deps: BTreeMap<String, Vec<String>>,
}

/// A validated workflow description.
///
/// Constructed via `TryFrom<RawWorkflowFile>` (see `config::validate`), so
/// holding one means ids are unique, every edge names a known job and the
/// graph is acyclic.
#[derive(Debug, Clone)]
pub struct WorkflowFile {
    pub convert: ConvertSection,
    pub workflow: Workflow,
}

impl WorkflowFile {
    pub(crate) fn new_unchecked(convert: ConvertSection, workflow: Workflow) -> Self {
        Self { convert, workflow }
    }
}

/// `[convert]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertSection {
    /// Group tokens, `"name"` or `"name:maxCores"`.
    #[serde(default)]
    pub groups: Vec<String>,

    /// Global default cap for fused groups. `0` or absent means no cap.
    #[serde(default)]
    pub max_cores: Option<u64>,

    /// Collapse linear chains of jobs with equal core counts.
    #[serde(default = "default_sequence_fusion")]
    pub sequence_fusion: bool,

    /// Seconds added to each task's runtime to form `runtime_limit`.
    #[serde(default = "default_runtime_buffer")]
    pub runtime_buffer: Seconds,

    /// Command template; `{id}` is replaced by the final task id.
    #[serde(default = "default_execution_cmd")]
    pub execution_cmd: String,
}

fn default_sequence_fusion() -> bool {
    true
}

pub(crate) fn default_runtime_buffer() -> Seconds {
    Seconds::Whole(60)
}

pub(crate) fn default_execution_cmd() -> String {
    "run-task {id}".to_string()
}

impl Default for ConvertSection {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            max_cores: None,
            sequence_fusion: default_sequence_fusion(),
            runtime_buffer: default_runtime_buffer(),
            execution_cmd: default_execution_cmd(),
        }
    }
}

/// One `[[job]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub id: String,
    pub name: String,
    pub runtime: Seconds,
    pub cores: u64,
}

impl From<JobConfig> for Job {
    fn from(cfg: JobConfig) -> Self {
        Job {
            id: cfg.id,
            name: cfg.name,
            runtime: cfg.runtime,
            cores: cfg.cores,
        }
    }
}
