/*
 * Priority Scheduler (preemptive)
 *
 * Always runs the READY task with the lowest current priority value
 * (ties broken by lowest id). Every tick it checks whether some READY
 * task now strictly outranks the RUNNING one and, if so, preempts it --
 * this is the only variant whose switches count as "preemptions" (see
 * glossary: preemption is specifically priority-driven).
 */

use crate::task::TaskId;

use super::base::SchedulerBase;
use super::traits::{Decision, SchedulingPolicy};

#[derive(Debug, Default)]
pub struct PriorityPolicy;

impl PriorityPolicy {
    pub fn new() -> Self {
        Self
    }

    fn best_ready(base: &SchedulerBase) -> Option<(TaskId, i32)> {
        base.ready_ids()
            .into_iter()
            .filter_map(|id| base.get(id).map(|t| (id, t.priority)))
            .min_by_key(|(id, priority)| (*priority, id.0))
    }
}

impl SchedulingPolicy for PriorityPolicy {
    fn decide(&mut self, base: &SchedulerBase) -> Decision {
        let best = Self::best_ready(base);
        match base.current_id() {
            Some(cur_id) => {
                let cur_priority = base.get(cur_id).map(|t| t.priority).unwrap_or(i32::MAX);
                match best {
                    Some((id, priority)) if priority < cur_priority => Decision::Preempt(id),
                    _ => Decision::Keep,
                }
            }
            None => Decision::Switch(best.map(|(id, _)| id)),
        }
    }

    fn on_switched(&mut self, _base: &SchedulerBase, _prev: Option<TaskId>, _next: Option<TaskId>) {}

    fn name(&self) -> &'static str {
        "priority"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::registers::RegisterSnapshot;
    use crate::scheduler::traits::SimHandle;

    struct FakeCpu(RegisterSnapshot);
    impl SimHandle for FakeCpu {
        fn register_snapshot(&self) -> RegisterSnapshot {
            self.0
        }
        fn restore_registers(&mut self, s: &RegisterSnapshot) {
            self.0 = *s;
        }
        fn init_registers(&mut self, entry: u32, sp: u32) {
            self.0 = RegisterSnapshot::zeroed();
            self.0.pc = entry;
            self.0.regs[2] = sp;
        }
    }

    #[test]
    fn lower_priority_value_preempts_higher() {
        let mut base = SchedulerBase::new(SchedulerConfig::default(), (0x9000_0000, 0x9010_0000));
        let mut cpu = FakeCpu(RegisterSnapshot::zeroed());
        let mut policy = PriorityPolicy::new();

        let a = base.create_task("a", 10, 0, None).unwrap();
        assert_eq!(policy.decide(&base), Decision::Switch(Some(a)));
        base.context_switch(&mut cpu, Some(a));

        let b = base.create_task("b", 3, 0, None).unwrap();
        assert_eq!(policy.decide(&base), Decision::Preempt(b));
    }

    #[test]
    fn ties_broken_by_lowest_id() {
        let mut base = SchedulerBase::new(SchedulerConfig::default(), (0x9000_0000, 0x9010_0000));
        let a = base.create_task("a", 5, 0, None).unwrap();
        let _b = base.create_task("b", 5, 0, None).unwrap();
        let mut policy = PriorityPolicy::new();
        assert_eq!(policy.decide(&base), Decision::Switch(Some(a)));
    }
}
