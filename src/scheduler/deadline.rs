//! Yield signals: when the work loop should hand control back to the host.

use std::time::{Duration, Instant};

use crate::engine::EngineConfig;

/// The host's "yield now?" signal, polled after every unit of work.
pub trait Deadline {
    fn should_yield(&mut self) -> bool;
}

/// Any `FnMut() -> bool` can act as a deadline.
impl<F: FnMut() -> bool> Deadline for F {
    fn should_yield(&mut self) -> bool {
        self()
    }
}

// ---------------------------------------------------------------------------
// IdleDeadline
// ---------------------------------------------------------------------------

/// Wall-clock budget for one idle period.
///
/// Yields once less than `threshold` of the budget remains, or once the
/// optional unit cap is used up.
#[derive(Debug, Clone)]
pub struct IdleDeadline {
    started: Instant,
    budget: Duration,
    threshold: Duration,
    units_left: Option<usize>,
}

impl IdleDeadline {
    /// A budget starting now, with a 1 ms yield threshold.
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
            threshold: Duration::from_millis(1),
            units_left: None,
        }
    }

    /// A budget shaped by the engine config: slice length, threshold, unit cap.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            started: Instant::now(),
            budget: config.time_slice,
            threshold: config.yield_threshold,
            units_left: config.max_units_per_slice,
        }
    }

    /// Time left in this idle period.
    pub fn time_remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }
}

impl Deadline for IdleDeadline {
    fn should_yield(&mut self) -> bool {
        if let Some(units) = self.units_left.as_mut() {
            *units = units.saturating_sub(1);
            if *units == 0 {
                return true;
            }
        }
        self.time_remaining() < self.threshold
    }
}

// ---------------------------------------------------------------------------
// UnitBudget
// ---------------------------------------------------------------------------

/// Yield after a fixed number of units. Deterministic; used for tests and
/// frame-count-driven hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitBudget {
    remaining: usize,
}

impl UnitBudget {
    pub fn new(units: usize) -> Self {
        Self { remaining: units }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Deadline for UnitBudget {
    fn should_yield(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

/// Never yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn should_yield(&mut self) -> bool {
        false
    }
}
