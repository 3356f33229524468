/*
 * Scheduler Base (mechanism layer)
 *
 * Owns the task table and everything every scheduling variant shares:
 * creation/termination/blocking/sleeping, the stack allocator, aging,
 * sleep wakeup, context switching against a `SimHandle`, and metrics.
 * Mirrors the teacher's `SchedulerCore` mechanism layer plus the
 * lifecycle operations of `ThreadManager`/`ProcessManager`, collapsed
 * into a single owner since this crate has one task table rather than a
 * process/thread split.
 */

use std::collections::BTreeMap;

use crate::config::SchedulerConfig;
use crate::error::{Result, SimError};
use crate::task::{StackRegion, Task, TaskId, TaskState, TaskStats};

use super::metrics::Metrics;
use super::traits::SimHandle;

/// Bump-with-free-list allocator over a reserved high-memory region,
/// per the design note in spec.md §9. Freed regions are reused
/// first-fit before the bump pointer advances further.
#[derive(Debug, Clone)]
struct StackAllocator {
    limit: u32,
    bump: u32,
    free: Vec<StackRegion>,
}

impl StackAllocator {
    fn new(base: u32, limit: u32) -> Self {
        Self {
            limit,
            bump: base,
            free: Vec::new(),
        }
    }

    fn allocate(&mut self, size: u32) -> Option<StackRegion> {
        if let Some(pos) = self.free.iter().position(|r| r.size >= size) {
            let region = self.free.remove(pos);
            return Some(StackRegion { base: region.base, size });
        }
        let end = self.bump.checked_add(size)?;
        if end > self.limit {
            return None;
        }
        let region = StackRegion { base: self.bump, size };
        self.bump = end;
        Some(region)
    }

    fn free(&mut self, region: StackRegion) {
        self.free.push(region);
    }
}

/// Shared scheduler state and lifecycle mechanism.
pub struct SchedulerBase {
    tasks: BTreeMap<TaskId, Task>,
    next_id: u32,
    current: Option<TaskId>,
    tick_count: u64,
    config: SchedulerConfig,
    metrics: Metrics,
    stacks: StackAllocator,
}

impl SchedulerBase {
    /// `stack_region` is the `[base, limit)` range of simulator memory
    /// the scheduler is allowed to carve task stacks out of.
    pub fn new(config: SchedulerConfig, stack_region: (u32, u32)) -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
            current: None,
            tick_count: 0,
            config,
            metrics: Metrics::new(),
            stacks: StackAllocator::new(stack_region.0, stack_region.1),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn current_id(&self) -> Option<TaskId> {
        self.current
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn is_ready(&self, id: TaskId) -> bool {
        self.tasks.get(&id).is_some_and(|t| t.state.is_ready())
    }

    /// Ready task ids in ascending id order (the tie-break every
    /// variant uses).
    pub fn ready_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|(_, t)| t.state.is_ready())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn tasks(&self) -> Vec<TaskStats> {
        self.tasks.values().map(Task::stats).collect()
    }

    pub fn current(&self) -> Option<TaskStats> {
        self.current.and_then(|id| self.tasks.get(&id)).map(Task::stats)
    }

    fn validate_priority(priority: i32) -> Result<()> {
        if (1..=32).contains(&priority) {
            Ok(())
        } else {
            Err(SimError::InvalidPriority(priority))
        }
    }

    /// `spec.md` §4.5 `create_task`.
    pub fn create_task(
        &mut self,
        name: &str,
        priority: i32,
        entry_point: u32,
        stack_size: Option<u32>,
    ) -> Result<TaskId> {
        Self::validate_priority(priority)?;
        let size = stack_size.unwrap_or(self.config.default_stack_size);
        let stack = self
            .stacks
            .allocate(size)
            .ok_or(SimError::OutOfMemory { requested: size as usize })?;

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let task = Task::new(id, name.to_string(), priority, entry_point, stack, self.tick_count);
        log::info!(
            "created task {id} '{name}' priority={priority} entry=0x{entry_point:x} stack=[0x{:x},0x{:x})",
            stack.base,
            stack.end()
        );
        self.tasks.insert(id, task);
        Ok(id)
    }

    /// `spec.md` §4.5 `terminate`. Idempotent.
    pub fn terminate(&mut self, id: TaskId) -> Result<()> {
        let task = self.tasks.get_mut(&id).ok_or(SimError::UnknownTask(id.0))?;
        if task.state.is_terminated() {
            return Ok(());
        }
        let old_state = task.state;
        task.state = TaskState::Terminated;
        let region = task.stack;
        self.metrics.record_transition(old_state, TaskState::Terminated);
        self.stacks.free(region);

        if self.current == Some(id) {
            self.current = None;
        }
        log::info!("terminated task {id}");
        Ok(())
    }

    /// `spec.md` §4.5 `block`.
    pub fn block(&mut self, id: TaskId) -> Result<()> {
        let task = self.tasks.get_mut(&id).ok_or(SimError::UnknownTask(id.0))?;
        match task.state {
            TaskState::Blocked => Ok(()),
            TaskState::Ready | TaskState::Running => {
                let old_state = task.state;
                task.state = TaskState::Blocked;
                self.metrics.record_transition(old_state, TaskState::Blocked);
                if self.current == Some(id) {
                    self.current = None;
                }
                Ok(())
            }
            TaskState::Terminated => Err(SimError::BadState {
                task: id.0,
                reason: "cannot block a terminated task",
            }),
            TaskState::Sleeping { .. } => Err(SimError::BadState {
                task: id.0,
                reason: "cannot block a sleeping task",
            }),
        }
    }

    /// `spec.md` §4.5 `unblock`.
    pub fn unblock(&mut self, id: TaskId) -> Result<()> {
        let task = self.tasks.get_mut(&id).ok_or(SimError::UnknownTask(id.0))?;
        match task.state {
            TaskState::Ready => Ok(()),
            TaskState::Blocked => {
                task.state = TaskState::Ready;
                task.wait_ticks = 0;
                self.metrics.record_transition(TaskState::Blocked, TaskState::Ready);
                Ok(())
            }
            _ => Err(SimError::BadState {
                task: id.0,
                reason: "unblock is only valid from BLOCKED or READY",
            }),
        }
    }

    /// `spec.md` §4.5 `sleep`. `ticks <= 0` is equivalent to immediate READY.
    pub fn sleep(&mut self, id: TaskId, ticks: i64) -> Result<()> {
        let now = self.tick_count;
        let task = self.tasks.get_mut(&id).ok_or(SimError::UnknownTask(id.0))?;
        match task.state {
            TaskState::Ready | TaskState::Running => {
                let old_state = task.state;
                if ticks <= 0 {
                    task.state = TaskState::Ready;
                    task.wait_ticks = 0;
                } else {
                    task.state = TaskState::Sleeping { until: now + ticks as u64 };
                }
                self.metrics.record_transition(old_state, task.state);
                if self.current == Some(id) {
                    self.current = None;
                }
                Ok(())
            }
            _ => Err(SimError::BadState {
                task: id.0,
                reason: "sleep is only valid from READY or RUNNING",
            }),
        }
    }

    /// `spec.md` §4.5 `set_priority`. Does not change state.
    pub fn set_priority(&mut self, id: TaskId, priority: i32) -> Result<()> {
        Self::validate_priority(priority)?;
        let task = self.tasks.get_mut(&id).ok_or(SimError::UnknownTask(id.0))?;
        task.priority = priority;
        task.original_priority = priority;
        Ok(())
    }

    /// Advance the logical tick counter; step 1 of the per-tick pipeline.
    pub(super) fn advance_tick(&mut self) -> u64 {
        self.tick_count += 1;
        self.tick_count
    }

    /// Wake every SLEEPING task whose deadline has passed.
    pub(super) fn wake_sleepers(&mut self) {
        let now = self.tick_count;
        let Self { tasks, metrics, .. } = self;
        for task in tasks.values_mut() {
            if let TaskState::Sleeping { until } = task.state {
                if until <= now {
                    metrics.record_transition(task.state, TaskState::Ready);
                    task.state = TaskState::Ready;
                    task.wait_ticks = 0;
                }
            }
        }
    }

    /// Increment `wait_ticks` for every READY task, then every
    /// `aging_interval` ticks lower the current priority (floor 1) of
    /// any READY task that has waited at least `aging_threshold` ticks.
    pub(super) fn apply_aging(&mut self) {
        if !self.config.aging_enabled {
            return;
        }
        let now = self.tick_count;
        let interval = self.config.aging_interval.max(1) as u64;
        let threshold = self.config.aging_threshold;
        let Self { tasks, .. } = self;

        for task in tasks.values_mut() {
            if task.state.is_ready() {
                task.wait_ticks += 1;
            }
        }

        if now % interval == 0 {
            for task in tasks.values_mut() {
                if task.state.is_ready() && task.wait_ticks >= threshold {
                    let before = task.priority;
                    task.priority = (task.priority - 1).max(1);
                    task.wait_ticks = 0;
                    if task.priority != before {
                        log::debug!(
                            "aged task {} priority {} -> {}",
                            task.id,
                            before,
                            task.priority
                        );
                    }
                }
            }
        }
    }

    /// Restore a dispatched task's priority toward `original_priority`
    /// by at most one step.
    fn restore_toward_original(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.get_mut(&id) {
            if task.priority < task.original_priority {
                task.priority += 1;
            }
        }
    }

    /// `spec.md` §4.5 `context_switch`. Saves the outgoing RUNNING
    /// task's CPU state (if any), then either restores or freshly
    /// initializes the incoming task's CPU state.
    pub fn context_switch(&mut self, sim: &mut dyn SimHandle, next: Option<TaskId>) {
        if let Some(cur_id) = self.current {
            if let Some(cur) = self.tasks.get_mut(&cur_id) {
                if cur.state.is_running() {
                    cur.registers = sim.register_snapshot();
                    let old_state = cur.state;
                    cur.state = TaskState::Ready;
                    self.metrics.record_transition(old_state, TaskState::Ready);
                }
            }
        }

        match next {
            Some(next_id) => {
                let (ever_run, entry_point, sp, snapshot) = {
                    let task = self
                        .tasks
                        .get(&next_id)
                        .expect("policy selected a task id not in the task table");
                    (task.ever_run, task.entry_point, task.stack.initial_sp(), task.registers)
                };

                if ever_run {
                    sim.restore_registers(&snapshot);
                } else {
                    sim.init_registers(entry_point, sp);
                }

                let now = self.tick_count;
                let task = self
                    .tasks
                    .get_mut(&next_id)
                    .expect("policy selected a task id not in the task table");
                let old_state = task.state;
                task.state = TaskState::Running;
                task.ever_run = true;
                task.last_run_tick = now;
                self.metrics.record_transition(old_state, TaskState::Running);
                self.metrics.context_switches += 1;
                self.current = Some(next_id);
                self.restore_toward_original(next_id);

                log::debug!("context switch -> {next_id}");
            }
            None => {
                self.current = None;
            }
        }
    }

    /// Record a Priority-scheduler preemption. Kept distinct from the
    /// generic context-switch counter since only priority-driven
    /// switches count as preemptions (see glossary).
    pub(super) fn record_preemption(&mut self) {
        self.metrics.preemptions += 1;
    }

    /// `spec.md` §5 step 6: increment `run_count` bookkeeping for whichever
    /// task is current once this tick's scheduling decision has settled.
    /// Fires once per tick, not once per dispatch -- a task that keeps
    /// running across several ticks accumulates a tick each time, matching
    /// the worked round-robin example in spec.md §8 scenario 2.
    pub(super) fn record_tick_execution(&mut self) {
        if let Some(id) = self.current {
            if let Some(task) = self.tasks.get_mut(&id) {
                task.run_count += 1;
            }
        }
    }
}
