// tests/pipeline_properties.rs

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;

use dagmanifest::config::{ConvertOptions, GroupSpec};
use dagmanifest::dag::{
    fuse_dependencies, fuse_jobs, fuse_sequences, simulate, DepMap, FusionMap, Job, Workflow,
};
use dagmanifest::errors::ManifestError;
use dagmanifest::manifest::Manifest;
use dagmanifest::pipeline::convert;

const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

// Strategy to generate a valid workflow.
// We ensure acyclicity by only allowing job N to depend on jobs 0..N-1.
fn workflow_strategy(max_jobs: usize) -> impl Strategy<Value = Workflow> {
    (1..=max_jobs).prop_flat_map(|num_jobs| {
        let jobs_strat = proptest::collection::vec(
            (0..NAMES.len(), 0u64..500, 1u64..64),
            num_jobs,
        );
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..3),
            num_jobs,
        );

        (jobs_strat, deps_strat).prop_map(move |(specs, raw_deps)| {
            let jobs: Vec<Job> = specs
                .into_iter()
                .enumerate()
                .map(|(i, (name, runtime, cores))| {
                    Job::new(format!("job_{i}"), NAMES[name], runtime, cores)
                })
                .collect();

            let mut deps = DepMap::new();
            for (i, potential_parents) in raw_deps.into_iter().enumerate() {
                if i == 0 {
                    continue;
                }
                for p in potential_parents {
                    deps.entry(format!("job_{}", p % i))
                        .or_insert_with(BTreeSet::new)
                        .insert(format!("job_{i}"));
                }
            }

            Workflow::new(jobs, deps)
        })
    })
}

fn groups_strategy() -> impl Strategy<Value = Vec<GroupSpec>> {
    proptest::collection::vec((0..NAMES.len(), proptest::option::of(0u64..200)), 0..3).prop_map(
        |raw| {
            raw.into_iter()
                .map(|(name, cap)| GroupSpec {
                    name: NAMES[name].to_string(),
                    max_cores: cap,
                })
                .collect()
        },
    )
}

/// Longest path finish time, computed independently of the simulator.
fn critical_path_end(wf: &Workflow) -> f64 {
    let mut finish: Vec<f64> = vec![0.0; wf.jobs.len()];
    let index = |id: &str| wf.jobs.iter().position(|j| j.id == id).unwrap();
    // Jobs are generated in topological order.
    for (i, job) in wf.jobs.iter().enumerate() {
        let start = wf
            .edges()
            .filter(|(_, child)| *child == job.id)
            .map(|(parent, _)| finish[index(parent)])
            .fold(0.0, f64::max);
        finish[i] = start + job.runtime.as_f64();
    }
    finish.into_iter().fold(0.0, f64::max)
}

proptest! {
    #[test]
    fn test_fusion_preserves_member_cores_and_runtimes(
        wf in workflow_strategy(12),
        groups in groups_strategy(),
    ) {
        let original = wf.jobs.clone();
        let fusion = fuse_jobs(wf.jobs, &groups, None).unwrap();

        for account in fusion.accounts.iter() {
            let members = fusion.fusion_map.members_of(&account.group).unwrap();
            let member_jobs: Vec<&Job> = original
                .iter()
                .filter(|j| members.contains(&j.id))
                .collect();

            let cores: u64 = member_jobs.iter().map(|j| j.cores).sum();
            let runtime: f64 = member_jobs.iter().map(|j| j.runtime.as_f64()).sum();
            prop_assert_eq!(account.cores, cores);
            prop_assert_eq!(account.acc_runtime.as_f64(), runtime);
            prop_assert_eq!(account.task_count as usize, member_jobs.len());
        }

        let absorbed: usize = fusion.fusion_map.iter().map(|(_, m)| m.len()).sum();
        prop_assert_eq!(fusion.jobs.len() + absorbed, original.len() + fusion.accounts.len());
    }

    #[test]
    fn test_dependency_fusion_keeps_graph_valid_and_is_idempotent(
        wf in workflow_strategy(12),
        groups in groups_strategy(),
    ) {
        let fusion = fuse_jobs(wf.jobs.clone(), &groups, None).unwrap();
        let deps = fuse_dependencies(&wf.deps, &fusion.fusion_map);
        let fused = Workflow::new(fusion.jobs, deps.clone());
        prop_assert!(fused.check_integrity("property").is_ok());

        let again = fuse_dependencies(&deps, &FusionMap::new());
        prop_assert_eq!(again, deps);
    }

    #[test]
    fn test_sequence_fusion_preserves_total_runtime(wf in workflow_strategy(12)) {
        let before_jobs = wf.jobs.len();
        let before: f64 = wf.jobs.iter().map(|j| j.runtime.as_f64()).sum();

        let mut fused = wf;
        let n = fuse_sequences(&mut fused);
        let after: f64 = fused.jobs.iter().map(|j| j.runtime.as_f64()).sum();

        prop_assert_eq!(before, after);
        prop_assert_eq!(fused.jobs.len(), before_jobs - n);
        prop_assert!(fused.check_integrity("property").is_ok());
    }

    #[test]
    fn test_simulation_bounds_and_ordering(wf in workflow_strategy(12)) {
        let timeline = simulate(&wf).unwrap();

        let all_cores: u64 = wf.jobs.iter().map(|j| j.cores).sum();
        prop_assert!(timeline.max_cores() <= all_cores);
        prop_assert_eq!(timeline.total_runtime().as_f64(), critical_path_end(&wf));

        for pair in timeline.steps.windows(2) {
            prop_assert!(pair[0].end_time < pair[1].end_time);
        }

        // Core-seconds under the curve equal the work in the job set.
        let mut prev = 0.0;
        let mut area = 0.0;
        for step in timeline.steps.iter() {
            let end = step.end_time.as_f64();
            area += step.num_cores as f64 * (end - prev);
            prev = end;
        }
        prop_assert_eq!(area, wf.core_seconds());
    }

    #[test]
    fn test_manifest_summary_matches_resource_steps(
        wf in workflow_strategy(12),
        groups in groups_strategy(),
    ) {
        let options = ConvertOptions { groups, ..ConvertOptions::default() };
        let manifest = match convert(wf, &options) {
            Ok(manifest) => manifest,
            // Fusing a group whose members sit on both sides of another job
            // closes a cycle; that is rejected, not converted.
            Err(ManifestError::DagCycle(_)) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        };

        let (max_cores, total_runtime) = Manifest::summary_from_steps(&manifest.resource_steps);
        prop_assert_eq!(max_cores, manifest.max_cores);
        prop_assert_eq!(total_runtime, manifest.total_runtime);

        let ids: HashSet<&str> = manifest.tasks.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(ids.len(), manifest.tasks.len());
    }
}
