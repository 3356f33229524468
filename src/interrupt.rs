/*
 * Interrupt Controller
 *
 * Registers interrupt lines, tracks which are pending, and resolves the
 * highest-priority pending interrupt (lowest priority value, ties broken
 * by lowest id). Standard ids per spec: TIMER=7, EXTERNAL=11, SOFTWARE=3.
 */

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, SimError};

pub const TIMER: u32 = 7;
pub const EXTERNAL: u32 = 11;
pub const SOFTWARE: u32 = 3;

/// A registered interrupt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptLine {
    pub id: u32,
    pub priority: u32,
    pub handler_address: u32,
    pub description: String,
}

/// The pending interrupt with the lowest (priority, id) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInterrupt {
    pub id: u32,
    pub priority: u32,
    pub handler_address: u32,
}

/// Interrupt controller: registration table + pending bitset + enable flag.
#[derive(Debug, Clone)]
pub struct InterruptController {
    lines: BTreeMap<u32, InterruptLine>,
    pending: BTreeSet<u32>,
    enabled: bool,
}

impl InterruptController {
    pub fn new() -> Self {
        Self {
            lines: BTreeMap::new(),
            pending: BTreeSet::new(),
            enabled: true,
        }
    }

    /// Register (or re-register) an interrupt id.
    pub fn register(&mut self, id: u32, priority: u32, handler_address: u32, description: &str) {
        self.lines.insert(
            id,
            InterruptLine {
                id,
                priority,
                handler_address,
                description: description.to_string(),
            },
        );
    }

    /// Mark `id` pending. Fails if `id` was never registered.
    pub fn trigger(&mut self, id: u32) -> Result<()> {
        if !self.lines.contains_key(&id) {
            return Err(SimError::UnknownInterrupt(id));
        }
        self.pending.insert(id);
        log::debug!("interrupt {id} triggered");
        Ok(())
    }

    /// Clear the pending bit for `id`. Fails if `id` was never registered.
    pub fn clear(&mut self, id: u32) -> Result<()> {
        if !self.lines.contains_key(&id) {
            return Err(SimError::UnknownInterrupt(id));
        }
        self.pending.remove(&id);
        Ok(())
    }

    /// True iff enabled and at least one interrupt is pending.
    pub fn has_pending(&self) -> bool {
        self.enabled && !self.pending.is_empty()
    }

    /// The pending interrupt with the lowest priority value (ties broken
    /// by lowest id), or `None` if disabled or nothing pending.
    pub fn highest_pending(&self) -> Option<PendingInterrupt> {
        if !self.enabled {
            return None;
        }
        self.pending
            .iter()
            .filter_map(|id| self.lines.get(id))
            .min_by_key(|line| (line.priority, line.id))
            .map(|line| PendingInterrupt {
                id: line.id,
                priority: line.priority,
                handler_address: line.handler_address,
            })
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Clear all pending bits; registrations are kept.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn lines(&self) -> impl Iterator<Item = &InterruptLine> {
        self.lines.values()
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}
