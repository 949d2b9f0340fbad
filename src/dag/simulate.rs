// src/dag/simulate.rs

//! Event-driven walk of the DAG producing the aggregate core-demand curve.
//!
//! The model is a greedy, infinite-capacity scheduler: a job starts the
//! instant its last parent finishes and runs for its full runtime. The
//! output is the demand curve, not a feasibility-checked allocation.

use serde::Serialize;
use tracing::{debug, trace};

use crate::dag::{DagGraph, Workflow, total_cores};
use crate::errors::{ManifestError, Result};
use crate::types::Seconds;

/// Aggregate demand of `num_cores` that lasts until `end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceStep {
    pub num_cores: u64,
    pub end_time: Seconds,
}

/// Simulated timeline; `end_time` strictly increases across `steps`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub steps: Vec<ResourceStep>,
}

impl Timeline {
    pub fn max_cores(&self) -> u64 {
        self.steps.iter().map(|s| s.num_cores).max().unwrap_or(0)
    }

    pub fn total_runtime(&self) -> Seconds {
        self.steps.last().map(|s| s.end_time).unwrap_or(Seconds::ZERO)
    }
}

/// Scheduling state for one job, indexed like the [`DagGraph`] arena.
#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    completed: bool,
    /// Parents that have not completed yet.
    waiting_on: usize,
    start: Seconds,
    end: Seconds,
}

/// Run the simulation.
///
/// All jobs finishing at the same instant are retired in one step, and jobs
/// they release with zero runtime are retired in that same step, so exactly
/// one entry exists per distinct completion time.
///
/// Fails with [`ManifestError::SimulationStalled`] if jobs remain that could
/// never start (a cycle slipped past validation).
pub fn simulate(workflow: &Workflow) -> Result<Timeline> {
    let graph = DagGraph::from_workflow(workflow)?;
    let jobs = &workflow.jobs;

    let mut state: Vec<SlotState> = (0..graph.len())
        .map(|i| SlotState {
            waiting_on: graph.parents_of(i).len(),
            ..SlotState::default()
        })
        .collect();

    let mut running: Vec<usize> = graph.sources().collect();
    for &idx in running.iter() {
        state[idx].start = Seconds::ZERO;
        state[idx].end = jobs[idx].runtime;
    }

    let mut timeline = Timeline::default();
    let mut completed = 0usize;

    while !running.is_empty() {
        let num_cores = total_cores(running.iter().map(|&i| &jobs[i]))?;
        let next_time = running
            .iter()
            .map(|&i| state[i].end)
            .fold(None, |min: Option<Seconds>, end| match min {
                Some(m) if m <= end => Some(m),
                _ => Some(end),
            })
            .unwrap_or(Seconds::ZERO);

        timeline.steps.push(ResourceStep {
            num_cores,
            end_time: next_time,
        });
        trace!(num_cores, end_time = %next_time, "resource step");

        let (mut finished, still_running): (Vec<usize>, Vec<usize>) =
            running.into_iter().partition(|&i| state[i].end == next_time);
        running = still_running;

        while let Some(idx) = finished.pop() {
            state[idx].completed = true;
            completed += 1;

            for &child in graph.children_of(idx) {
                let slot = &mut state[child];
                slot.waiting_on -= 1;
                if slot.waiting_on > 0 {
                    continue;
                }

                slot.start = next_time;
                slot.end = next_time + jobs[child].runtime;
                debug!(
                    job = %graph.id(child),
                    start = %slot.start,
                    end = %slot.end,
                    "job eligible"
                );

                if slot.end == next_time {
                    finished.push(child);
                } else {
                    running.push(child);
                }
            }
        }
    }

    if completed != graph.len() {
        let stuck = (0..graph.len())
            .filter(|&i| !state[i].completed)
            .map(|i| graph.id(i).to_string())
            .collect();
        return Err(ManifestError::SimulationStalled { stuck });
    }

    Ok(timeline)
}
