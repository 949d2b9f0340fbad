#![allow(dead_code)]

use std::collections::BTreeSet;

use dagmanifest::config::{validate_workflow, GroupSpec};
use dagmanifest::dag::{DepMap, Job, Workflow};
use dagmanifest::types::Seconds;

/// Builder for `Workflow` to simplify test setup.
///
/// Edges are given parent first: `.edge("a", "b")` means `b` waits for `a`.
pub struct WorkflowBuilder {
    jobs: Vec<Job>,
    deps: DepMap,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            deps: DepMap::new(),
        }
    }

    pub fn job(mut self, id: &str, name: &str, runtime: impl Into<Seconds>, cores: u64) -> Self {
        self.jobs.push(Job::new(id, name, runtime, cores));
        self
    }

    /// Add a job whose name equals its id.
    pub fn task(self, id: &str, runtime: u64, cores: u64) -> Self {
        self.job(id, id, runtime, cores)
    }

    pub fn edge(mut self, parent: &str, child: &str) -> Self {
        self.deps
            .entry(parent.to_string())
            .or_insert_with(BTreeSet::new)
            .insert(child.to_string());
        self
    }

    /// Add edges from `parent` to each of `children`.
    pub fn edges(mut self, parent: &str, children: &[&str]) -> Self {
        for child in children {
            self = self.edge(parent, child);
        }
        self
    }

    /// Build and check the input contract.
    pub fn build(self) -> Workflow {
        let workflow = self.build_unchecked();
        validate_workflow(&workflow).expect("Failed to build valid workflow from builder");
        workflow
    }

    pub fn build_unchecked(self) -> Workflow {
        Workflow::new(self.jobs, self.deps)
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a list of group tokens, panicking on bad input.
pub fn groups(tokens: &[&str]) -> Vec<GroupSpec> {
    tokens
        .iter()
        .map(|t| t.parse::<GroupSpec>().expect("valid group token"))
        .collect()
}

/// The seven-job coastal-model workflow used across the tests.
///
/// Sources are `adcirc` and `ww3`; the greedy timeline is
/// `(512,3600) (256,39600) (18,68400) (200,79200) (8,86400) (160,100800) (256,117000)`.
pub fn coastal_workflow() -> Workflow {
    WorkflowBuilder::new()
        .task("sin", 14400, 160)
        .task("adcirc2", 16200, 256)
        .task("sos", 28800, 10)
        .task("adcirc", 39600, 256)
        .task("son", 46800, 8)
        .task("sis", 10800, 192)
        .task("ww3", 3600, 256)
        .edges("son", &["sin"])
        .edges("adcirc", &["sin", "sos", "son", "sis"])
        .edges("sis", &["adcirc2"])
        .edges("sin", &["adcirc2"])
        .edges("ww3", &["sos", "son"])
        .edges("sos", &["sis"])
        .build()
}
