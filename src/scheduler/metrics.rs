/*
 * Scheduler Metrics
 *
 * A small plain record of counters, exposed by value snapshot rather
 * than by shared mutable reference -- the same convention the teacher's
 * `ThreadManager::stats()` and `PerCpuSchedState` counters follow.
 */

use std::collections::HashMap;

use crate::task::TaskState;

/// Context-switch / preemption counters plus a transition histogram
/// keyed by `(from_state, to_state)` tag pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub context_switches: u64,
    pub preemptions: u64,
    transitions: HashMap<(&'static str, &'static str), u64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn record_transition(&mut self, from: TaskState, to: TaskState) {
        *self.transitions.entry((from.tag(), to.tag())).or_insert(0) += 1;
    }

    pub fn transition_count(&self, from: &str, to: &str) -> u64 {
        self.transitions
            .iter()
            .find(|((f, t), _)| *f == from && *t == to)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn transitions(&self) -> impl Iterator<Item = (&(&'static str, &'static str), &u64)> {
        self.transitions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_counts_transitions() {
        let mut m = Metrics::new();
        m.record_transition(TaskState::Ready, TaskState::Running);
        m.record_transition(TaskState::Ready, TaskState::Running);
        m.record_transition(TaskState::Running, TaskState::Blocked);

        assert_eq!(m.transition_count("READY", "RUNNING"), 2);
        assert_eq!(m.transition_count("RUNNING", "BLOCKED"), 1);
        assert_eq!(m.transition_count("BLOCKED", "READY"), 0);
    }
}
