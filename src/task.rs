/*
 * Task
 *
 * Identity, priority, lifecycle state and saved CPU snapshot for one
 * schedulable task. Mirrors the teacher's `Thread` (id, name, state,
 * accounting fields), generalized with a priority pair (`priority` /
 * `original_priority`) for aging and a reserved stack region since this
 * crate has no separate Process abstraction above it.
 */

use core::fmt;

use crate::registers::RegisterSnapshot;

/// Unique task identifier. Monotonically allocated, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// Lifecycle state of a task. `Sleeping` carries its own wakeup deadline
/// so `sleep_until` is only ever meaningful while actually asleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Ready,
    Running,
    Blocked,
    Sleeping { until: u64 },
    Terminated,
}

impl TaskState {
    pub fn is_ready(&self) -> bool {
        matches!(self, TaskState::Ready)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TaskState::Running)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, TaskState::Terminated)
    }

    /// Short tag used for display and the metrics transition histogram.
    pub fn tag(&self) -> &'static str {
        match self {
            TaskState::Ready => "READY",
            TaskState::Running => "RUNNING",
            TaskState::Blocked => "BLOCKED",
            TaskState::Sleeping { .. } => "SLEEPING",
            TaskState::Terminated => "TERMINATED",
        }
    }
}

/// A task's reserved stack region: `[base, base + size)`. Regions of live
/// tasks are pairwise disjoint and lie inside memory bounds (enforced by
/// the scheduler's stack allocator, not by this type).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackRegion {
    pub base: u32,
    pub size: u32,
}

impl StackRegion {
    pub fn end(&self) -> u32 {
        self.base + self.size
    }

    /// Initial stack pointer for a fresh task: top of the region.
    pub fn initial_sp(&self) -> u32 {
        self.end()
    }
}

/// One schedulable task.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub priority: i32,
    pub original_priority: i32,
    pub state: TaskState,
    pub entry_point: u32,
    pub stack: StackRegion,

    /// Saved register snapshot, restored on context switch-in.
    pub registers: RegisterSnapshot,

    /// `true` until the task has been dispatched for the first time, at
    /// which point context switch-in restores `registers` instead of
    /// initializing fresh CPU state from `entry_point`/stack top.
    pub ever_run: bool,

    /// Ticks spent continuously READY since the task last ran; drives
    /// aging and is reset on unblock/wakeup/dispatch.
    pub wait_ticks: u32,

    pub run_count: u64,
    pub last_run_tick: u64,
    pub created_tick: u64,
}

impl Task {
    pub fn new(
        id: TaskId,
        name: String,
        priority: i32,
        entry_point: u32,
        stack: StackRegion,
        created_tick: u64,
    ) -> Self {
        Self {
            id,
            name,
            priority,
            original_priority: priority,
            state: TaskState::Ready,
            entry_point,
            stack,
            registers: RegisterSnapshot::zeroed(),
            ever_run: false,
            wait_ticks: 0,
            run_count: 0,
            last_run_tick: created_tick,
            created_tick,
        }
    }

    /// Snapshot fields useful for inspectors (`tasks()` in spec §6), kept
    /// separate from `Task` itself so external callers cannot mutate
    /// live scheduler state through it.
    pub fn stats(&self) -> TaskStats {
        TaskStats {
            id: self.id,
            name: self.name.clone(),
            priority: self.priority,
            original_priority: self.original_priority,
            state: self.state,
            run_count: self.run_count,
            last_run_tick: self.last_run_tick,
            created_tick: self.created_tick,
        }
    }
}

/// Read-only snapshot of a task, safe to hand out to external inspectors.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStats {
    pub id: TaskId,
    pub name: String,
    pub priority: i32,
    pub original_priority: i32,
    pub state: TaskState,
    pub run_count: u64,
    pub last_run_tick: u64,
    pub created_tick: u64,
}
