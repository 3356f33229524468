/*
 * Simulator Error Types
 *
 * All fallible operations on the simulator core return `Result<T, SimError>`.
 * Idempotent no-ops (re-terminating a terminated task, blocking an already
 * blocked one, ...) are not errors; see the call sites in `scheduler::base`.
 */

use thiserror::Error;

/// Errors produced by the simulator core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// `priority` was outside the valid range `[1, 32]`.
    #[error("invalid priority {0}: must be in [1, 32]")]
    InvalidPriority(i32),

    /// No task with the given id exists in the task table.
    #[error("unknown task {0}")]
    UnknownTask(u32),

    /// The requested state transition is not valid from the task's current
    /// state (e.g. unblocking a RUNNING task).
    #[error("invalid state transition for task {task}: {reason}")]
    BadState { task: u32, reason: &'static str },

    /// No free stack region of the requested size exists.
    #[error("out of memory: no stack region of {requested} bytes available")]
    OutOfMemory { requested: usize },

    /// A memory access fell outside `[0, size)`.
    #[error("memory access out of bounds: addr=0x{addr:x} len={len} size={size}")]
    Bounds { addr: u32, len: usize, size: usize },

    /// An operation referenced an interrupt id that was never registered.
    #[error("unknown interrupt id {0}")]
    UnknownInterrupt(u32),

    /// The scheduler factory was given a tag it does not recognize.
    #[error("unknown scheduler tag '{0}'")]
    UnknownScheduler(String),
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = core::result::Result<T, SimError>;
