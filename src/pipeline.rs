// src/pipeline.rs

//! End-to-end conversion: workflow in, manifest out.
//!
//! Stages run strictly in sequence on a workflow owned by this call:
//! job fusion, dependency fusion, sequence fusion (optional), canonical
//! naming, resource simulation, manifest encoding. The input contract is
//! checked before anything runs, and every fusion stage re-checks graph
//! integrity before handing over. Dependency fusion is also re-checked for
//! cycles.

use std::fmt;

use tracing::info;

use crate::config::{ConvertOptions, ensure_acyclic, validate_workflow};
use crate::dag::{
    FusionMap, GroupAccount, Timeline, Workflow, fuse_dependencies, fuse_jobs, fuse_sequences,
    rename_topologically, simulate,
};
use crate::errors::Result;
use crate::manifest::{EncodeSettings, GraphRenderer, Manifest, StrictDigraph, encode_manifest};

/// Pipeline stage identifiers, reported to a [`ProgressSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    JobFusion,
    DependencyFusion,
    SequenceFusion,
    Naming,
    Simulation,
    Encoding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Validate => "validate",
            Stage::JobFusion => "job-fusion",
            Stage::DependencyFusion => "dependency-fusion",
            Stage::SequenceFusion => "sequence-fusion",
            Stage::Naming => "naming",
            Stage::Simulation => "simulation",
            Stage::Encoding => "encoding",
        };
        f.write_str(s)
    }
}

/// Graph size after a stage finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub jobs: usize,
    pub edges: usize,
}

/// Receives a report after each stage.
///
/// The default [`TracingProgress`] logs through `tracing`; tests and the
/// dry-run output collect reports with [`RecordingProgress`].
pub trait ProgressSink {
    fn stage_finished(&mut self, report: StageReport);
}

/// Emit one `info` event per stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn stage_finished(&mut self, report: StageReport) {
        info!(
            stage = %report.stage,
            jobs = report.jobs,
            edges = report.edges,
            "stage finished"
        );
    }
}

/// Keep every report in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    pub reports: Vec<StageReport>,
}

impl ProgressSink for RecordingProgress {
    fn stage_finished(&mut self, report: StageReport) {
        self.reports.push(report);
    }
}

/// Full result of a conversion, for diagnostics.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub manifest: Manifest,
    /// The graph the manifest was built from (canonical ids).
    pub workflow: Workflow,
    pub timeline: Timeline,
    pub fusion_map: FusionMap,
    pub accounts: Vec<GroupAccount>,
    /// Pairs collapsed by sequence fusion.
    pub sequence_fusions: usize,
}

/// Convert a workflow into a manifest, logging progress via `tracing`.
pub fn convert(workflow: Workflow, options: &ConvertOptions) -> Result<Manifest> {
    let conversion = convert_with(workflow, options, &StrictDigraph, &mut TracingProgress)?;
    Ok(conversion.manifest)
}

/// Convert with an explicit renderer and progress sink.
pub fn convert_with(
    workflow: Workflow,
    options: &ConvertOptions,
    renderer: &dyn GraphRenderer,
    progress: &mut dyn ProgressSink,
) -> Result<Conversion> {
    let mut report = |stage: Stage, wf: &Workflow| {
        progress.stage_finished(StageReport {
            stage,
            jobs: wf.jobs.len(),
            edges: wf.edge_count(),
        });
    };

    validate_workflow(&workflow)?;
    report(Stage::Validate, &workflow);

    let Workflow { jobs, deps } = workflow;
    let fusion = fuse_jobs(jobs, &options.groups, options.default_max_cores)?;
    let mut workflow = Workflow::new(fusion.jobs, deps);
    report(Stage::JobFusion, &workflow);

    workflow.deps = fuse_dependencies(&workflow.deps, &fusion.fusion_map);
    workflow.check_integrity("dependency fusion")?;
    ensure_acyclic(&workflow)?;
    report(Stage::DependencyFusion, &workflow);

    let sequence_fusions = if options.sequence_fusion {
        let n = fuse_sequences(&mut workflow);
        workflow.check_integrity("sequence fusion")?;
        report(Stage::SequenceFusion, &workflow);
        n
    } else {
        0
    };

    let workflow = rename_topologically(workflow)?;
    report(Stage::Naming, &workflow);

    let timeline = simulate(&workflow)?;
    report(Stage::Simulation, &workflow);

    let settings = EncodeSettings::from(options);
    let manifest = encode_manifest(&workflow, &timeline, &settings, renderer);
    report(Stage::Encoding, &workflow);

    Ok(Conversion {
        manifest,
        workflow,
        timeline,
        fusion_map: fusion.fusion_map,
        accounts: fusion.accounts,
        sequence_fusions,
    })
}
