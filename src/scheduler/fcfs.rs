/*
 * First-Come-First-Served Scheduler (non-preemptive)
 *
 * Once a task is running it stays running until it blocks, sleeps, or
 * terminates -- this policy never preempts. When the CPU is idle it
 * dispatches the READY task that has waited longest since it last ran,
 * ties broken by lowest id.
 */

use crate::task::TaskId;

use super::base::SchedulerBase;
use super::traits::{Decision, SchedulingPolicy};

#[derive(Debug, Default)]
pub struct FcfsPolicy;

impl FcfsPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for FcfsPolicy {
    fn decide(&mut self, base: &SchedulerBase) -> Decision {
        if base.current_id().is_some() {
            return Decision::Keep;
        }
        let next = base
            .ready_ids()
            .into_iter()
            .filter_map(|id| base.get(id).map(|t| (id, t.last_run_tick)))
            .min_by_key(|(id, last_run_tick)| (*last_run_tick, id.0))
            .map(|(id, _)| id);
        Decision::Switch(next)
    }

    fn on_switched(&mut self, _base: &SchedulerBase, _prev: Option<TaskId>, _next: Option<TaskId>) {}

    fn name(&self) -> &'static str {
        "fcfs"
    }
}
