// src/dag/graph.rs

use std::collections::HashMap;

use crate::dag::{JobId, Workflow};
use crate::errors::{ManifestError, Result};

/// Index-based adjacency view over a [`Workflow`].
///
/// Jobs are addressed by their position in `workflow.jobs`; parents and
/// children are stored as index lists. The view borrows nothing, so callers
/// can keep per-job state in side tables indexed the same way.
#[derive(Debug, Clone)]
pub struct DagGraph {
    ids: Vec<JobId>,
    index: HashMap<JobId, usize>,
    parents: Vec<Vec<usize>>,
    children: Vec<Vec<usize>>,
}

impl DagGraph {
    /// Build the adjacency view.
    ///
    /// Fails with [`ManifestError::Integrity`] if an edge names a job that is
    /// not in the job list.
    pub fn from_workflow(workflow: &Workflow) -> Result<Self> {
        let ids: Vec<JobId> = workflow.jobs.iter().map(|j| j.id.clone()).collect();
        let index: HashMap<JobId, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut parents = vec![Vec::new(); ids.len()];
        let mut children = vec![Vec::new(); ids.len()];

        for (parent, child) in workflow.edges() {
            let (Some(&p), Some(&c)) = (index.get(parent), index.get(child)) else {
                return Err(ManifestError::Integrity(format!(
                    "edge {parent} -> {child} references a job outside the graph"
                )));
            };
            children[p].push(c);
            parents[c].push(p);
        }

        Ok(Self {
            ids,
            index,
            parents,
            children,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn id(&self, idx: usize) -> &str {
        &self.ids[idx]
    }

    /// Immediate parents of a job (jobs it waits for).
    pub fn parents_of(&self, idx: usize) -> &[usize] {
        &self.parents[idx]
    }

    /// Immediate children of a job (jobs waiting for it).
    pub fn children_of(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    /// Jobs that never appear as an edge destination.
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.ids.len()).filter(|&i| self.parents[i].is_empty())
    }
}
