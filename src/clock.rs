/*
 * Clock / Tick Loop Driver
 *
 * Thin driver over `Simulator::tick` offering the step and continuous
 * run modes an external shell (out of scope here) would wire to its
 * `step`/`continue` commands. Mirrors the teacher's small runner loop
 * that just calls into the kernel tick function in a bounded or
 * unbounded fashion.
 */

use crate::simulator::Simulator;

/// Advance the simulator by exactly one tick.
pub fn step(sim: &mut Simulator) {
    sim.tick();
}

/// Advance the simulator by `n` ticks.
pub fn run_for(sim: &mut Simulator, n: u64) {
    for _ in 0..n {
        sim.tick();
    }
}

/// Advance the simulator until no task is current and none are ready,
/// or until `max_ticks` elapses first (guards against a config with no
/// tasks ever becoming ready, e.g. everything asleep forever).
///
/// Returns `true` if the simulator went idle before the limit, `false`
/// if `max_ticks` was exhausted first.
pub fn run_until_idle(sim: &mut Simulator, max_ticks: u64) -> bool {
    for _ in 0..max_ticks {
        sim.tick();
        let sched = sim.scheduler();
        if sched.current().is_none() && sched.tasks().iter().all(|t| !t.state.is_ready()) {
            return true;
        }
    }
    false
}
