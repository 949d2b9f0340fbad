// tests/dependency_fusion.rs
mod common;
use crate::common::builders::{coastal_workflow, groups, WorkflowBuilder};
use crate::common::init_tracing;

use std::collections::BTreeSet;
use std::error::Error;

use dagmanifest::dag::{fuse_dependencies, fuse_jobs, FusionMap, Workflow};

type TestResult = Result<(), Box<dyn Error>>;

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Two same-named producers feeding two consumers, one of them shared.
fn fan_in() -> Workflow {
    WorkflowBuilder::new()
        .job("p1", "prep", 10u64, 2)
        .job("p2", "prep", 10u64, 2)
        .job("c1", "solve", 50u64, 8)
        .job("c2", "post", 5u64, 1)
        .edges("p1", &["c1"])
        .edges("p2", &["c1", "c2"])
        .build()
}

#[test]
fn sources_collapsing_into_one_aggregate_union_their_children() -> TestResult {
    init_tracing();

    let wf = fan_in();
    let fusion = fuse_jobs(wf.jobs.clone(), &groups(&["prep"]), None)?;
    let deps = fuse_dependencies(&wf.deps, &fusion.fusion_map);

    assert_eq!(deps.len(), 1);
    assert_eq!(deps.get("prep"), Some(&set(&["c1", "c2"])));

    let fused = Workflow::new(fusion.jobs, deps);
    fused.check_integrity("test")?;
    Ok(())
}

#[test]
fn destinations_are_translated_and_deduplicated() -> TestResult {
    init_tracing();

    let wf = WorkflowBuilder::new()
        .job("root", "root", 1u64, 1)
        .job("w1", "work", 10u64, 4)
        .job("w2", "work", 10u64, 4)
        .job("w3", "work", 10u64, 4)
        .edges("root", &["w1", "w2", "w3"])
        .build();

    let fusion = fuse_jobs(wf.jobs.clone(), &groups(&["work"]), None)?;
    let deps = fuse_dependencies(&wf.deps, &fusion.fusion_map);

    assert_eq!(deps.get("root"), Some(&set(&["work"])));
    Ok(())
}

#[test]
fn edges_inside_a_group_are_dropped() -> TestResult {
    init_tracing();

    let wf = WorkflowBuilder::new()
        .job("a", "g", 1u64, 1)
        .job("b", "g", 1u64, 1)
        .job("c", "tail", 1u64, 1)
        .edges("a", &["b"])
        .edges("b", &["c"])
        .build();

    let fusion = fuse_jobs(wf.jobs.clone(), &groups(&["g"]), None)?;
    let deps = fuse_dependencies(&wf.deps, &fusion.fusion_map);

    assert_eq!(deps.get("g"), Some(&set(&["c"])));
    assert_eq!(deps.len(), 1);
    Ok(())
}

#[test]
fn empty_fusion_map_is_a_no_op() {
    init_tracing();

    let wf = coastal_workflow();
    let deps = fuse_dependencies(&wf.deps, &FusionMap::new());
    assert_eq!(deps, wf.deps);

    let again = fuse_dependencies(&deps, &FusionMap::new());
    assert_eq!(again, deps);
}

#[test]
fn stale_fusion_map_is_caught_by_integrity_check() {
    init_tracing();

    let wf = fan_in();
    // Claims p1 was absorbed into an aggregate that is not in the job list.
    let mut stale = FusionMap::new();
    stale.insert("ghost", vec!["p1".to_string()]);

    let deps = fuse_dependencies(&wf.deps, &stale);
    let broken = Workflow::new(wf.jobs.clone(), deps);
    let err = broken.check_integrity("dependency fusion").unwrap_err();
    assert!(err.to_string().contains("ghost"));
}
