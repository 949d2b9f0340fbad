// src/manifest/mod.rs

//! The manifest handed to the downstream scheduling simulator.
//!
//! Field names and types are part of the external contract; see
//! [`Manifest`].

pub mod encoder;
pub mod render;

use serde::Serialize;

use crate::errors::Result;
use crate::types::Seconds;

pub use crate::dag::ResourceStep;
pub use encoder::{EncodeSettings, encode_manifest};
pub use render::{GraphRenderer, StrictDigraph};

/// One task as seen by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub runtime_limit: Seconds,
    pub runtime_sim: Seconds,
    pub number_of_cores: u64,
    pub execution_cmd: String,
}

/// Final output record of one conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub tasks: Vec<Task>,
    pub resource_steps: Vec<ResourceStep>,
    pub max_cores: u64,
    pub total_runtime: Seconds,
    pub dot_dag: String,
}

impl Manifest {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Recompute `(max_cores, total_runtime)` from the resource steps alone.
    pub fn summary_from_steps(steps: &[ResourceStep]) -> (u64, Seconds) {
        let max_cores = steps.iter().map(|s| s.num_cores).max().unwrap_or(0);
        let total_runtime = steps.last().map(|s| s.end_time).unwrap_or(Seconds::ZERO);
        (max_cores, total_runtime)
    }
}
