/*
 * Scheduler Factory
 *
 * Maps the configured scheduler-type tag to a boxed policy, the same
 * role the teacher's scheduler-construction helper plays when wiring a
 * concrete `Scheduler` impl from configuration.
 */

use crate::error::{Result, SimError};

use super::fcfs::FcfsPolicy;
use super::priority::PriorityPolicy;
use super::round_robin::RoundRobinPolicy;
use super::traits::SchedulingPolicy;

/// Construct a policy by name. Recognized tags: `"priority"`,
/// `"round-robin"`, `"fcfs"`.
pub fn make_policy(tag: &str) -> Result<Box<dyn SchedulingPolicy>> {
    match tag {
        "priority" => Ok(Box::new(PriorityPolicy::new())),
        "round-robin" => Ok(Box::new(RoundRobinPolicy::new())),
        "fcfs" => Ok(Box::new(FcfsPolicy::new())),
        other => Err(SimError::UnknownScheduler(other.to_string())),
    }
}
