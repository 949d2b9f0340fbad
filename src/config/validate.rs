// src/config/validate.rs

use std::collections::{BTreeSet, HashSet};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{RawWorkflowFile, WorkflowFile};
use crate::dag::{DepMap, Job, Workflow, total_cores};
use crate::errors::{ManifestError, Result};

impl TryFrom<RawWorkflowFile> for WorkflowFile {
    type Error = ManifestError;

    fn try_from(raw: RawWorkflowFile) -> std::result::Result<Self, Self::Error> {
        let jobs: Vec<Job> = raw.jobs.into_iter().map(Job::from).collect();

        let mut deps = DepMap::new();
        for (parent, children) in raw.deps {
            if children.is_empty() {
                continue;
            }
            deps.entry(parent)
                .or_insert_with(BTreeSet::new)
                .extend(children);
        }

        let workflow = Workflow { jobs, deps };
        validate_workflow(&workflow)?;
        Ok(WorkflowFile::new_unchecked(raw.convert, workflow))
    }
}

/// Check the input contract of the pipeline.
///
/// Every failure here is fatal and happens before any transformation runs.
pub fn validate_workflow(workflow: &Workflow) -> Result<()> {
    ensure_has_jobs(workflow)?;
    validate_jobs(workflow)?;
    validate_dependencies(workflow)?;
    ensure_acyclic(workflow)?;
    Ok(())
}

fn ensure_has_jobs(workflow: &Workflow) -> Result<()> {
    if workflow.jobs.is_empty() {
        return Err(ManifestError::ConfigError(
            "workflow must contain at least one [[job]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_jobs(workflow: &Workflow) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for job in workflow.jobs.iter() {
        if job.id.trim().is_empty() {
            return Err(ManifestError::InvalidJob {
                job: job.name.clone(),
                reason: "empty id".to_string(),
            });
        }
        if !job.runtime.is_valid() {
            return Err(ManifestError::InvalidJob {
                job: job.id.clone(),
                reason: format!("runtime must be a non-negative number (got {})", job.runtime),
            });
        }
        if !seen.insert(job.id.as_str()) {
            return Err(ManifestError::DuplicateJob(job.id.clone()));
        }
    }
    // Every later core sum covers a subset of these jobs.
    total_cores(&workflow.jobs)?;
    Ok(())
}

fn validate_dependencies(workflow: &Workflow) -> Result<()> {
    let known: HashSet<&str> = workflow.jobs.iter().map(|j| j.id.as_str()).collect();

    for (parent, children) in workflow.deps.iter() {
        for child in children.iter() {
            for end in [parent, child] {
                if !known.contains(end.as_str()) {
                    return Err(ManifestError::UnknownJob {
                        parent: parent.clone(),
                        child: child.clone(),
                        missing: end.clone(),
                    });
                }
            }
            if parent == child {
                return Err(ManifestError::SelfLoop(parent.clone()));
            }
        }
    }
    Ok(())
}

/// Fail with [`ManifestError::DagCycle`] if the dependency graph has a cycle.
///
/// Also run by the pipeline after dependency fusion, since merging a group
/// whose members sit on both sides of another job closes a loop.
pub fn ensure_acyclic(workflow: &Workflow) -> Result<()> {
    // Edge direction: parent -> child, as stored in `deps`.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for job in workflow.jobs.iter() {
        graph.add_node(job.id.as_str());
    }

    for (parent, children) in workflow.deps.iter() {
        for child in children.iter() {
            graph.add_edge(parent.as_str(), child.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    if toposort(&graph, None).is_ok() {
        return Ok(());
    }

    let mut stuck: Vec<&str> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .flatten()
        .collect();
    stuck.sort_unstable();

    Err(ManifestError::DagCycle(format!(
        "cycle detected in job DAG involving jobs: {}",
        stuck.join(", ")
    )))
}
