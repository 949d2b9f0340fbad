// tests/sequence_fusion.rs
mod common;
use crate::common::builders::{coastal_workflow, WorkflowBuilder};
use crate::common::init_tracing;

use std::collections::BTreeSet;

use dagmanifest::dag::fuse_sequences;
use dagmanifest::types::Seconds;

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn equal_core_chain_collapses_into_one_job() {
    init_tracing();

    let mut wf = WorkflowBuilder::new()
        .task("a", 10, 4)
        .task("b", 20, 4)
        .task("c", 30, 4)
        .edge("a", "b")
        .edge("b", "c")
        .build();

    let fused = fuse_sequences(&mut wf);

    assert_eq!(fused, 2);
    assert_eq!(wf.jobs.len(), 1);
    assert_eq!(wf.jobs[0].id, "a");
    assert_eq!(wf.jobs[0].runtime, Seconds::Whole(60));
    assert!(wf.deps.is_empty());
}

#[test]
fn fused_job_inherits_the_absorbed_children() {
    init_tracing();

    let mut wf = WorkflowBuilder::new()
        .task("a", 10, 4)
        .task("b", 20, 4)
        .task("x", 5, 1)
        .task("y", 5, 2)
        .edge("a", "b")
        .edges("b", &["x", "y"])
        .build();

    assert_eq!(fuse_sequences(&mut wf), 1);
    assert_eq!(wf.deps.get("a"), Some(&set(&["x", "y"])));
    assert!(!wf.deps.contains_key("b"));
    assert!(wf.job("b").is_none());
}

#[test]
fn different_core_counts_do_not_fuse() {
    init_tracing();

    let mut wf = WorkflowBuilder::new()
        .task("a", 10, 4)
        .task("b", 20, 8)
        .edge("a", "b")
        .build();

    assert_eq!(fuse_sequences(&mut wf), 0);
    assert_eq!(wf.jobs.len(), 2);
}

#[test]
fn shared_child_or_branching_parent_blocks_fusion() {
    init_tracing();

    // b has two parents; a has two children.
    let mut wf = WorkflowBuilder::new()
        .task("a", 10, 4)
        .task("z", 10, 4)
        .task("b", 20, 4)
        .task("c", 20, 4)
        .edges("a", &["b", "c"])
        .edge("z", "b")
        .build();

    assert_eq!(fuse_sequences(&mut wf), 0);
}

#[test]
fn runtime_along_a_chain_is_preserved() {
    init_tracing();

    let mut wf = WorkflowBuilder::new()
        .job("a", "a", 1.5f64, 2)
        .task("b", 2, 2)
        .task("c", 3, 2)
        .edge("a", "b")
        .edge("b", "c")
        .build();

    let before: f64 = wf.jobs.iter().map(|j| j.runtime.as_f64()).sum();
    fuse_sequences(&mut wf);
    let after: f64 = wf.jobs.iter().map(|j| j.runtime.as_f64()).sum();

    assert_eq!(before, after);
    assert_eq!(wf.jobs[0].runtime, Seconds::Fractional(6.5));
}

#[test]
fn coastal_workflow_has_nothing_to_fuse() {
    init_tracing();

    let mut wf = coastal_workflow();
    assert_eq!(fuse_sequences(&mut wf), 0);
    assert_eq!(wf, coastal_workflow());
}
