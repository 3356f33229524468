/*
 * Scheduler Trait Definitions
 *
 * Separates scheduling *policy* from the shared *mechanism*
 * (`SchedulerBase`), the same split the teacher draws between
 * `traits::Scheduler` (policy) and `traits::KernelSchedCtx` (mechanism
 * capability interface). A policy never touches CPU registers directly;
 * it only ever sees a `SimHandle` borrowed for the duration of one tick.
 */

use crate::registers::RegisterSnapshot;
use crate::task::TaskId;

use super::base::SchedulerBase;

/// The scheduler's narrow view onto simulated CPU state, borrowed only
/// for the lifetime of a context switch. Implemented directly by
/// [`crate::registers::RegisterFile`] so the simulator can hand over a
/// plain `&mut` field without an extra wrapper type.
pub trait SimHandle {
    /// Full copy of the live register file + PC.
    fn register_snapshot(&self) -> RegisterSnapshot;

    /// Overwrite the live register file from a saved snapshot.
    fn restore_registers(&mut self, snapshot: &RegisterSnapshot);

    /// Initialize CPU state for a task's first dispatch: PC = entry
    /// point, stack pointer register (x2) = `sp`, everything else zero.
    fn init_registers(&mut self, entry_point: u32, sp: u32);
}

/// What a scheduling pass decided to do, returned by
/// [`SchedulingPolicy::decide`]. Kept as its own type (rather than
/// folding the "should we switch" question into `schedule()`) so each
/// variant can express its own preemption rule without duplicating the
/// base's context-switch bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Leave the current task running; no context switch this tick.
    Keep,
    /// Perform an ordinary (voluntary-origin) context switch. `None`
    /// means go idle.
    Switch(Option<TaskId>),
    /// Forcibly context-switch away from a still-RUNNING task. Only the
    /// Priority scheduler produces this; it is the only variant whose
    /// switches count as "preemptions" per spec.
    Preempt(TaskId),
}

/// A pluggable scheduling algorithm operating over a shared
/// [`SchedulerBase`]. Mirrors the teacher's `Scheduler` policy trait:
/// the mechanism (`base.rs`) owns all task data, and the policy only
/// ever reads it and returns a decision.
pub trait SchedulingPolicy {
    /// Examine ready/running tasks in `base` and decide what to do this
    /// tick. Called once per tick after the base has woken sleepers and
    /// applied aging.
    fn decide(&mut self, base: &SchedulerBase) -> Decision;

    /// Notification that a context switch (of any kind) completed.
    /// Policies that need to track rotation order or timeslice state
    /// (round-robin) hook in here.
    fn on_switched(&mut self, base: &SchedulerBase, prev: Option<TaskId>, next: Option<TaskId>);

    /// Human-readable scheduler type name, per spec §6 `scheduler_type()`.
    fn name(&self) -> &'static str;

    /// Clear any internal rotation/accounting state the policy keeps
    /// (e.g. round-robin's timeslice counter). Called when the
    /// simulator is reset. Most policies are stateless and can use the
    /// default no-op.
    fn reset(&mut self) {}
}
