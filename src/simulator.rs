/*
 * Simulator Host
 *
 * Owns CPU state (registers, flat memory, interrupt controller) and
 * drives the per-tick pipeline: timer bookkeeping, interrupt dispatch,
 * scheduler pre-pass + schedule/switch, then a single no-op "execute"
 * step. Mirrors the teacher's top-level kernel/runtime owner that wires
 * together CPU state and the thread manager behind one `tick`-shaped
 * entry point.
 */

use crate::config::SimulatorConfig;
use crate::interrupt::{InterruptController, TIMER};
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::scheduler::traits::SchedulingPolicy;
use crate::scheduler::Scheduler;
use crate::config::SchedulerConfig;

/// Upper half of memory is reserved for task stacks; the lower half is
/// free for loaded program images. A dedicated config knob isn't needed
/// at this scale -- the split is fixed and documented here.
fn stack_region(memory_size: usize) -> (u32, u32) {
    let base = (memory_size / 2) as u32;
    let limit = memory_size as u32;
    (base, limit)
}

/// The simulated RISC-V hart plus its scheduler.
pub struct Simulator {
    registers: RegisterFile,
    memory: Memory,
    interrupts: InterruptController,
    scheduler: Scheduler,
    config: SimulatorConfig,
    timer_elapsed: u32,
}

impl Simulator {
    /// Build a simulator with a given memory size and an initial
    /// scheduling policy. `scheduler_config` carries the aging/time-slice
    /// knobs shared by every scheduler variant.
    pub fn new(config: SimulatorConfig, scheduler_config: SchedulerConfig, policy: Box<dyn SchedulingPolicy>) -> Self {
        let mut interrupts = InterruptController::new();
        interrupts.register(TIMER, TIMER, 0, "timer");

        let region = stack_region(config.memory_size);
        Self {
            registers: RegisterFile::new(),
            memory: Memory::new(config.memory_size),
            interrupts,
            scheduler: Scheduler::new(scheduler_config, region, policy),
            config,
            timer_elapsed: 0,
        }
    }

    /// Write `words` as consecutive little-endian 32-bit words starting
    /// at `base_addr`.
    pub fn load_program(&mut self, words: &[u32], base_addr: u32) -> crate::error::Result<()> {
        for (i, word) in words.iter().enumerate() {
            let addr = base_addr.wrapping_add((i as u32) * 4);
            self.memory.write_word(addr, *word)?;
        }
        Ok(())
    }

    /// Zero memory and registers, clear interrupt pending bits, and tell
    /// the scheduler to discard all tasks/metrics.
    pub fn reset(&mut self) {
        self.registers.reset();
        self.memory.reset();
        self.interrupts.reset();
        self.timer_elapsed = 0;
        let region = stack_region(self.config.memory_size);
        self.scheduler.reset(region);
    }

    /// Swap the active scheduling policy without disturbing tasks.
    pub fn set_scheduler(&mut self, policy: Box<dyn SchedulingPolicy>) {
        self.scheduler.set_policy(policy);
    }

    /// Advance logical time by one tick and run the full pipeline
    /// described in spec §5: timer bookkeeping, interrupt dispatch,
    /// scheduler pre-pass + schedule/switch, then a single execute step.
    pub fn tick(&mut self) {
        self.scheduler.advance_tick();

        self.timer_elapsed += 1;
        if self.timer_elapsed >= self.config.timer_period.max(1) {
            self.timer_elapsed = 0;
            if let Err(err) = self.interrupts.trigger(TIMER) {
                log::warn!("failed to assert timer interrupt: {err}");
            }
        }

        if self.interrupts.has_pending() {
            if let Some(pending) = self.interrupts.highest_pending() {
                // Redirects the executing PC only; no return address is
                // saved anywhere (documented simplification).
                let _ = self.interrupts.clear(pending.id);
                self.registers.write_pc(pending.handler_address);
                log::debug!("dispatched interrupt {} -> pc=0x{:x}", pending.id, pending.handler_address);
            }
        }

        self.scheduler.on_tick(&mut self.registers);

        // "Execute" one step of whichever task is current after this
        // tick's scheduling decision: bump its run_count, read the word at
        // PC (swallowing bounds errors so a corrupted PC can't kill the
        // tick), then advance PC by 4.
        self.scheduler.record_tick_execution();
        let pc = self.registers.read_pc();
        match self.memory.read_word(pc) {
            Ok(_word) => {}
            Err(err) => log::debug!("execute step at pc=0x{pc:x} swallowed: {err}"),
        }
        self.registers.write_pc(pc.wrapping_add(4));
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }
}
