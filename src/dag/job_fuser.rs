// src/dag/job_fuser.rs

//! Merge same-named jobs into resource-aggregated jobs.
//!
//! Members of a group are assumed to be logically concurrent: the aggregate
//! asks for the sum of their cores and runs as long as the slowest member.
//! When a core cap applies, the aggregate is reshaped into sequential waves
//! of members that fit under the cap.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::GroupSpec;
use crate::dag::{Job, JobId, total_cores};
use crate::errors::{ManifestError, Result};
use crate::types::Seconds;

/// New aggregate id -> original ids it absorbed, in original job order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FusionMap {
    entries: BTreeMap<JobId, Vec<JobId>>,
}

impl FusionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, aggregate: impl Into<JobId>, members: Vec<JobId>) {
        self.entries.insert(aggregate.into(), members);
    }

    pub fn members_of(&self, aggregate: &str) -> Option<&[JobId]> {
        self.entries.get(aggregate).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[JobId])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absorbed id -> aggregate id.
    pub fn inverse(&self) -> HashMap<&str, &str> {
        self.entries
            .iter()
            .flat_map(|(agg, members)| members.iter().map(move |m| (m.as_str(), agg.as_str())))
            .collect()
    }
}

/// Accounting for one fused group, taken before any cap was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAccount {
    pub group: String,
    pub task_count: u64,
    /// Sum of member cores.
    pub cores: u64,
    /// Longest member runtime.
    pub runtime: Seconds,
    /// Sum of member runtimes.
    pub acc_runtime: Seconds,
    /// Largest single-member core count.
    pub member_cores: u64,
    /// Cap that was applied, if the aggregate exceeded it.
    pub cap: Option<u64>,
}

/// Output of [`fuse_jobs`].
#[derive(Debug, Clone)]
pub struct JobFusion {
    /// Aggregates in group order, then untouched jobs in original order.
    pub jobs: Vec<Job>,
    pub fusion_map: FusionMap,
    pub accounts: Vec<GroupAccount>,
}

/// Fuse every job whose name matches one of `groups`.
///
/// The aggregate takes the group name as both id and name. A group that
/// matches no job produces an empty fusion entry and no aggregate.
pub fn fuse_jobs(
    jobs: Vec<Job>,
    groups: &[GroupSpec],
    default_max_cores: Option<u64>,
) -> Result<JobFusion> {
    let groups = dedup_groups(groups);
    let slot_of: HashMap<&str, usize> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| (g.name.as_str(), i))
        .collect();

    let mut members: Vec<Vec<Job>> = vec![Vec::new(); groups.len()];
    let mut untouched = Vec::new();

    for job in jobs {
        match slot_of.get(job.name.as_str()) {
            Some(&slot) => members[slot].push(job),
            None => untouched.push(job),
        }
    }

    let untouched_ids: HashSet<&str> = untouched.iter().map(|j| j.id.as_str()).collect();
    let mut fusion_map = FusionMap::new();
    let mut accounts = Vec::new();
    let mut aggregates = Vec::new();

    for (group, members) in groups.iter().zip(members) {
        if members.is_empty() {
            warn!(group = %group.name, "fusion group matches no jobs; nothing fused");
            fusion_map.insert(group.name.clone(), Vec::new());
            continue;
        }

        if untouched_ids.contains(group.name.as_str()) {
            return Err(ManifestError::DuplicateJob(format!(
                "{} (fused group name collides with an existing job id)",
                group.name
            )));
        }

        let cap = group
            .max_cores
            .or(default_max_cores)
            .filter(|cap| *cap > 0);

        let (job, account) = aggregate(&group.name, &members, cap)?;
        debug!(
            group = %group.name,
            members = account.task_count,
            cores = job.cores,
            runtime = %job.runtime,
            capped = account.cap.is_some(),
            "fused job group"
        );

        fusion_map.insert(
            group.name.clone(),
            members.into_iter().map(|m| m.id).collect(),
        );
        accounts.push(account);
        aggregates.push(job);
    }

    aggregates.extend(untouched);

    Ok(JobFusion {
        jobs: aggregates,
        fusion_map,
        accounts,
    })
}

/// Keep the first position of each group name; a later explicit cap for the
/// same name overrides an earlier one.
fn dedup_groups(groups: &[GroupSpec]) -> Vec<GroupSpec> {
    let mut out: Vec<GroupSpec> = Vec::with_capacity(groups.len());
    for group in groups {
        match out.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => {
                if group.max_cores.is_some() {
                    existing.max_cores = group.max_cores;
                }
            }
            None => out.push(group.clone()),
        }
    }
    out
}

fn aggregate(name: &str, members: &[Job], cap: Option<u64>) -> Result<(Job, GroupAccount)> {
    let task_count = members.len() as u64;
    let cores = total_cores(members)?;
    let runtime = members
        .iter()
        .map(|m| m.runtime)
        .fold(Seconds::ZERO, Seconds::max);
    let acc_runtime: Seconds = members.iter().map(|m| m.runtime).sum();
    let member_cores = members.iter().map(|m| m.cores).max().unwrap_or(0);

    let mut account = GroupAccount {
        group: name.to_string(),
        task_count,
        cores,
        runtime,
        acc_runtime,
        member_cores,
        cap: None,
    };

    let mut job = Job::new(name, name, runtime, cores);

    if let Some(cap) = cap {
        if cores > cap && member_cores > 0 {
            let (capped_cores, capped_runtime) = reshape(&account, cap);
            job.cores = capped_cores;
            job.runtime = capped_runtime;
            account.cap = Some(cap);
        }
    }

    Ok((job, account))
}

/// Fit a group under `cap` cores by running its members in waves.
///
/// The cap is floored to a whole number of member footprints (at least one),
/// and each wave lasts as long as the slowest member. For groups of identical
/// members this is `batches * (acc_runtime / task_count)` on
/// `floor(cap / per_member) * per_member` cores.
fn reshape(account: &GroupAccount, cap: u64) -> (u64, Seconds) {
    let per_member = account.member_cores;
    let per_wave = (cap / per_member).max(1);
    let batches = account.task_count.div_ceil(per_wave);
    let cores = per_wave.min(account.task_count) * per_member;
    (cores, account.runtime.times(batches))
}
