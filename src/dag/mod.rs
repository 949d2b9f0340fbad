// src/dag/mod.rs

//! Job graph representation and the transformation stages.
//!
//! - [`graph`] holds an index-based view of a [`Workflow`] (arena + adjacency).
//! - [`job_fuser`] merges same-named jobs into aggregates.
//! - [`dep_fuser`] rewrites edges through a [`FusionMap`].
//! - [`sequence_fuser`] collapses linear chains of equal-core jobs.
//! - [`naming`] assigns canonical, BFS-layered ids.
//! - [`simulate`] derives the core-demand timeline.

pub mod dep_fuser;
pub mod graph;
pub mod job_fuser;
pub mod naming;
pub mod sequence_fuser;
pub mod simulate;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::errors::{ManifestError, Result};
use crate::types::Seconds;

pub use dep_fuser::fuse_dependencies;
pub use graph::DagGraph;
pub use job_fuser::{FusionMap, GroupAccount, JobFusion, fuse_jobs};
pub use naming::{canonical_ids, rename_topologically};
pub use sequence_fuser::fuse_sequences;
pub use simulate::{ResourceStep, Timeline, simulate};

/// Canonical job id type used throughout the pipeline.
pub type JobId = String;

/// Parent id -> ids of the jobs that cannot start before it finishes.
pub type DepMap = BTreeMap<JobId, BTreeSet<JobId>>;

/// A unit of work with a fixed core requirement and runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    /// Logical name; several jobs may share one, which is what fusion keys on.
    pub name: String,
    pub runtime: Seconds,
    pub cores: u64,
}

impl Job {
    pub fn new(
        id: impl Into<JobId>,
        name: impl Into<String>,
        runtime: impl Into<Seconds>,
        cores: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            runtime: runtime.into(),
            cores,
        }
    }
}

/// Sum of the core counts of `jobs`.
///
/// Fails with [`ManifestError::InvalidJob`] naming the job that pushes the
/// total past `u64::MAX`.
pub fn total_cores<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Result<u64> {
    jobs.into_iter().try_fold(0u64, |total, job| {
        total
            .checked_add(job.cores)
            .ok_or_else(|| ManifestError::InvalidJob {
                job: job.id.clone(),
                reason: format!("core count {} overflows the workflow total", job.cores),
            })
    })
}

/// The live job set plus its dependency edges.
///
/// Owned by one conversion at a time; every stage consumes or mutates it in
/// place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    pub jobs: Vec<Job>,
    pub deps: DepMap,
}

impl Workflow {
    pub fn new(jobs: Vec<Job>, deps: DepMap) -> Self {
        Self { jobs, deps }
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn edge_count(&self) -> usize {
        self.deps.values().map(BTreeSet::len).sum()
    }

    /// Iterate over `(parent, child)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.deps.iter().flat_map(|(parent, children)| {
            children
                .iter()
                .map(move |child| (parent.as_str(), child.as_str()))
        })
    }

    /// Total work in core-seconds.
    pub fn core_seconds(&self) -> f64 {
        self.jobs
            .iter()
            .map(|j| j.cores as f64 * j.runtime.as_f64())
            .sum()
    }

    /// Check that ids are unique and that every edge references a live job.
    ///
    /// Stages call this after rewriting the graph; a failure means a stage
    /// lost track of a job and the run cannot continue.
    pub fn check_integrity(&self, stage: &str) -> Result<()> {
        let mut known: HashSet<&str> = HashSet::with_capacity(self.jobs.len());
        for job in self.jobs.iter() {
            if !known.insert(job.id.as_str()) {
                return Err(ManifestError::Integrity(format!(
                    "{stage}: job id '{}' appears more than once",
                    job.id
                )));
            }
        }

        for (parent, child) in self.edges() {
            for end in [parent, child] {
                if !known.contains(end) {
                    return Err(ManifestError::Integrity(format!(
                        "{stage}: edge {parent} -> {child} references unknown job '{end}'"
                    )));
                }
            }
        }
        Ok(())
    }
}
