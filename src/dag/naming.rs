// src/dag/naming.rs

//! Canonical, layered job ids.
//!
//! Ids are handed out breadth-first from the source jobs: sources first
//! (`S0`, `S1`, ... in lexicographic order of their current ids), then each
//! later layer. A job is numbered only once every one of its parents has
//! been numbered, so `number(parent) < number(child)` holds for every edge.
//! Children released by the same parent are queued in id order.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::dag::{DagGraph, DepMap, JobId, Workflow};
use crate::errors::{ManifestError, Result};

/// Prefix of every canonical id.
pub const ID_PREFIX: &str = "S";

/// Compute `(old id, new id)` pairs in numbering order.
pub fn canonical_ids(workflow: &Workflow) -> Result<Vec<(JobId, JobId)>> {
    let graph = DagGraph::from_workflow(workflow)?;

    let mut waiting: Vec<usize> = (0..graph.len())
        .map(|i| graph.parents_of(i).len())
        .collect();

    let mut sources: Vec<usize> = graph.sources().collect();
    sources.sort_by(|&a, &b| graph.id(a).cmp(graph.id(b)));

    let mut queue: VecDeque<usize> = sources.into_iter().collect();
    let mut order: Vec<usize> = Vec::with_capacity(graph.len());

    while let Some(idx) = queue.pop_front() {
        order.push(idx);

        let mut children: Vec<usize> = graph.children_of(idx).to_vec();
        children.sort_by(|&a, &b| graph.id(a).cmp(graph.id(b)));

        for child in children {
            waiting[child] -= 1;
            if waiting[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    if order.len() != graph.len() {
        let stuck: Vec<&str> = (0..graph.len())
            .filter(|&i| waiting[i] > 0)
            .map(|i| graph.id(i))
            .collect();
        return Err(ManifestError::DagCycle(format!(
            "jobs never became reachable from a source: {}",
            stuck.join(", ")
        )));
    }

    Ok(order
        .into_iter()
        .enumerate()
        .map(|(n, idx)| (graph.id(idx).to_string(), format!("{ID_PREFIX}{n}")))
        .collect())
}

/// Rename every job and edge to its canonical id. Jobs come back sorted by
/// their new number.
pub fn rename_topologically(workflow: Workflow) -> Result<Workflow> {
    let pairs = canonical_ids(&workflow)?;
    let rank: HashMap<&str, (usize, &str)> = pairs
        .iter()
        .enumerate()
        .map(|(n, (old, new))| (old.as_str(), (n, new.as_str())))
        .collect();

    let lookup = |id: &str| -> Result<(usize, String)> {
        rank.get(id)
            .map(|(n, new)| (*n, new.to_string()))
            .ok_or_else(|| ManifestError::Integrity(format!("job '{id}' has no canonical id")))
    };

    let mut ranked = Vec::with_capacity(workflow.jobs.len());
    for mut job in workflow.jobs {
        let (n, new) = lookup(&job.id)?;
        job.id = new;
        ranked.push((n, job));
    }
    ranked.sort_by_key(|(n, _)| *n);

    let mut deps = DepMap::new();
    for (parent, children) in workflow.deps {
        let (_, parent) = lookup(&parent)?;
        let children = children
            .iter()
            .map(|c| lookup(c).map(|(_, new)| new))
            .collect::<Result<BTreeSet<_>>>()?;
        deps.insert(parent, children);
    }

    Ok(Workflow {
        jobs: ranked.into_iter().map(|(_, job)| job).collect(),
        deps,
    })
}
