/*
 * Scheduler Facade
 *
 * Composes the shared mechanism (`base::SchedulerBase`) with a pluggable
 * `SchedulingPolicy`, the same two-piece shape the teacher's concrete
 * `Scheduler` impls wrap around `SchedulerCore`. External callers only
 * ever see this facade; the split into submodules is an implementation
 * detail.
 */

pub mod base;
pub mod fcfs;
pub mod factory;
pub mod metrics;
pub mod priority;
pub mod round_robin;
pub mod traits;

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::task::{TaskId, TaskStats};

use base::SchedulerBase;
use metrics::Metrics;
use traits::{Decision, SchedulingPolicy, SimHandle};

/// Owns task lifecycle + accounting (`SchedulerBase`) and delegates the
/// actual "who runs next" question to a boxed [`SchedulingPolicy`].
pub struct Scheduler {
    base: SchedulerBase,
    policy: Box<dyn SchedulingPolicy>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig, stack_region: (u32, u32), policy: Box<dyn SchedulingPolicy>) -> Self {
        Self {
            base: SchedulerBase::new(config, stack_region),
            policy,
        }
    }

    /// Swap the active scheduling policy. Task table and metrics are
    /// preserved; only the "who runs next" rule changes.
    pub fn set_policy(&mut self, policy: Box<dyn SchedulingPolicy>) {
        self.policy = policy;
    }

    pub fn scheduler_type(&self) -> &'static str {
        self.policy.name()
    }

    pub fn config(&self) -> &SchedulerConfig {
        self.base.config()
    }

    pub fn tick_count(&self) -> u64 {
        self.base.tick_count()
    }

    pub fn metrics(&self) -> &Metrics {
        self.base.metrics()
    }

    pub fn tasks(&self) -> Vec<TaskStats> {
        self.base.tasks()
    }

    pub fn current(&self) -> Option<TaskStats> {
        self.base.current()
    }

    pub fn create_task(
        &mut self,
        name: &str,
        priority: i32,
        entry_point: u32,
        stack_size: Option<u32>,
    ) -> Result<TaskId> {
        self.base.create_task(name, priority, entry_point, stack_size)
    }

    pub fn terminate(&mut self, id: TaskId) -> Result<()> {
        self.base.terminate(id)
    }

    pub fn block(&mut self, id: TaskId) -> Result<()> {
        self.base.block(id)
    }

    pub fn unblock(&mut self, id: TaskId) -> Result<()> {
        self.base.unblock(id)
    }

    pub fn sleep(&mut self, id: TaskId, ticks: i64) -> Result<()> {
        self.base.sleep(id, ticks)
    }

    pub fn set_priority(&mut self, id: TaskId, priority: i32) -> Result<()> {
        self.base.set_priority(id, priority)
    }

    /// Reinitialize the task table, metrics, tick counter and stack
    /// allocator, and let the policy clear any rotation state of its own.
    pub fn reset(&mut self, stack_region: (u32, u32)) {
        let config = self.base.config().clone();
        self.base = SchedulerBase::new(config, stack_region);
        self.policy.reset();
    }

    /// Run one tick of the scheduling pipeline: wake sleepers, apply
    /// aging, ask the policy what to do, then carry it out against
    /// `sim`. Called once per simulator tick, after the tick counter has
    /// already been advanced by the caller.
    pub fn on_tick(&mut self, sim: &mut dyn SimHandle) {
        self.base.wake_sleepers();
        self.base.apply_aging();

        let prev = self.base.current_id();
        match self.policy.decide(&self.base) {
            Decision::Keep => {}
            Decision::Switch(next) => {
                self.base.context_switch(sim, next);
                self.policy.on_switched(&self.base, prev, next);
            }
            Decision::Preempt(next) => {
                self.base.context_switch(sim, Some(next));
                self.base.record_preemption();
                self.policy.on_switched(&self.base, prev, Some(next));
            }
        }
    }

    pub(crate) fn advance_tick(&mut self) -> u64 {
        self.base.advance_tick()
    }

    /// `spec.md` §5 step 6, run once per tick by the simulator's execute
    /// step, after `on_tick` has settled who is current.
    pub(crate) fn record_tick_execution(&mut self) {
        self.base.record_tick_execution();
    }
}
