//! Core scheduler and task-lifecycle simulator for an educational
//! RISC-V-flavored multitasking kernel: a register file, flat memory,
//! interrupt controller, and a tick-driven simulator host wired to one
//! of three pluggable scheduling policies (priority-preemptive,
//! round-robin, FCFS).
//!
//! This crate is the simulation core only; a CLI/shell front end is out
//! of scope and documented as an external collaborator in `spec.md`.

pub mod clock;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod memory;
pub mod registers;
pub mod scheduler;
pub mod simulator;
pub mod task;

pub use config::{SchedulerConfig, SimulatorConfig};
pub use error::{Result, SimError};
pub use interrupt::{InterruptController, InterruptLine, PendingInterrupt, EXTERNAL, SOFTWARE, TIMER};
pub use memory::Memory;
pub use registers::{RegisterFile, RegisterSnapshot};
pub use scheduler::factory::make_policy;
pub use scheduler::fcfs::FcfsPolicy;
pub use scheduler::metrics::Metrics;
pub use scheduler::priority::PriorityPolicy;
pub use scheduler::round_robin::RoundRobinPolicy;
pub use scheduler::traits::{Decision, SchedulingPolicy, SimHandle};
pub use scheduler::Scheduler;
pub use simulator::Simulator;
pub use task::{StackRegion, Task, TaskId, TaskState, TaskStats};
