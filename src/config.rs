/*
 * Simulator & Scheduler Configuration
 *
 * Plain, Copy configuration structs. A CLI front-end (out of scope for
 * this crate) would parse flags like `--time-slice N` into these; the
 * core only needs the resulting values.
 */

/// Default flat memory size: 1 MiB, per spec.
pub const DEFAULT_MEMORY_SIZE: usize = 1024 * 1024;

/// Default per-task stack size in bytes.
pub const DEFAULT_STACK_SIZE: u32 = 1024;

/// Configuration for the [`crate::simulator::Simulator`] host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Size in bytes of the flat memory array.
    pub memory_size: usize,

    /// Ticks between automatic TIMER interrupt assertions.
    pub timer_period: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            timer_period: 1,
        }
    }
}

/// Configuration shared by every scheduler variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Ticks between aging passes.
    pub aging_interval: u32,

    /// Minimum continuous `wait_ticks` before a READY task is aged.
    pub aging_threshold: u32,

    /// Whether the aging algorithm runs at all.
    pub aging_enabled: bool,

    /// Round-robin time slice, in ticks. Unused by Priority and FCFS.
    pub time_slice: u32,

    /// Default stack size handed to `create_task` when unspecified.
    pub default_stack_size: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            aging_interval: 10,
            aging_threshold: 20,
            aging_enabled: true,
            time_slice: 10,
            default_stack_size: DEFAULT_STACK_SIZE,
        }
    }
}
