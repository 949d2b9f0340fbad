// src/manifest/encoder.rs

use crate::config::ConvertOptions;
use crate::dag::{Timeline, Workflow};
use crate::manifest::render::GraphRenderer;
use crate::manifest::{Manifest, Task};
use crate::types::Seconds;

/// Placeholder replaced by the task id in the command template.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Settings that shape each [`Task`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    /// Added to `runtime` to form `runtime_limit`.
    pub runtime_buffer: Seconds,
    /// Command template; every `{id}` becomes the task id.
    pub execution_cmd: String,
}

impl From<&ConvertOptions> for EncodeSettings {
    fn from(options: &ConvertOptions) -> Self {
        Self {
            runtime_buffer: options.runtime_buffer,
            execution_cmd: options.execution_cmd.clone(),
        }
    }
}

impl EncodeSettings {
    pub fn execution_cmd_for(&self, id: &str) -> String {
        self.execution_cmd.replace(ID_PLACEHOLDER, id)
    }
}

/// Assemble the manifest from the final graph and its simulated timeline.
pub fn encode_manifest(
    workflow: &Workflow,
    timeline: &Timeline,
    settings: &EncodeSettings,
    renderer: &dyn GraphRenderer,
) -> Manifest {
    let tasks = workflow
        .jobs
        .iter()
        .map(|job| Task {
            id: job.id.clone(),
            name: job.name.clone(),
            runtime_limit: job.runtime + settings.runtime_buffer,
            runtime_sim: job.runtime,
            number_of_cores: job.cores,
            execution_cmd: settings.execution_cmd_for(&job.id),
        })
        .collect();

    Manifest {
        tasks,
        resource_steps: timeline.steps.clone(),
        max_cores: timeline.max_cores(),
        total_runtime: timeline.total_runtime(),
        dot_dag: renderer.render(workflow),
    }
}
