// src/dag/sequence_fuser.rs

//! Chain contraction: `a -> b` where the edge is the only way out of `a`,
//! the only way into `b`, and both use the same number of cores becomes one
//! job running `a.runtime + b.runtime`.

use std::collections::HashMap;

use tracing::debug;

use crate::dag::{JobId, Workflow};

/// Collapse fusible pairs until none remain. Returns the number of fusions.
///
/// Each fusion removes one job, so this terminates after at most
/// `jobs.len() - 1` rounds. The scan restarts after every fusion because the
/// graph shape changed.
pub fn fuse_sequences(workflow: &mut Workflow) -> usize {
    let mut fused = 0;

    while let Some((orig, dst)) = find_fusible_pair(workflow) {
        fuse_pair(workflow, &orig, &dst);
        fused += 1;
    }

    fused
}

fn find_fusible_pair(workflow: &Workflow) -> Option<(JobId, JobId)> {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    for (_, child) in workflow.edges() {
        *in_degree.entry(child).or_insert(0) += 1;
    }

    let cores: HashMap<&str, u64> = workflow
        .jobs
        .iter()
        .map(|j| (j.id.as_str(), j.cores))
        .collect();

    for (orig, children) in workflow.deps.iter() {
        if children.len() != 1 {
            continue;
        }
        let Some(dst) = children.first() else {
            continue;
        };
        if in_degree.get(dst.as_str()) != Some(&1) {
            continue;
        }
        match (cores.get(orig.as_str()), cores.get(dst.as_str())) {
            (Some(a), Some(b)) if a == b => return Some((orig.clone(), dst.clone())),
            _ => continue,
        }
    }

    None
}

fn fuse_pair(workflow: &mut Workflow, orig: &str, dst: &str) {
    let Some(pos) = workflow.jobs.iter().position(|j| j.id == dst) else {
        return;
    };
    let removed = workflow.jobs.remove(pos);

    if let Some(job) = workflow.jobs.iter_mut().find(|j| j.id == orig) {
        job.runtime += removed.runtime;
        debug!(
            into = %orig,
            absorbed = %dst,
            runtime = %job.runtime,
            "fused sequential pair"
        );
    }

    match workflow.deps.remove(dst) {
        Some(children) if !children.is_empty() => {
            workflow.deps.insert(orig.to_string(), children);
        }
        _ => {
            workflow.deps.remove(orig);
        }
    }
}
