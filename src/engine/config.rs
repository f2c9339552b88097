//! Engine configuration.

use std::time::Duration;

/// Tuning knobs for scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Wall-clock budget for one idle slice of the async driver.
    pub time_slice: Duration,
    /// Yield once less than this much of the slice remains.
    pub yield_threshold: Duration,
    /// Optional hard cap on units per slice, on top of the time budget.
    pub max_units_per_slice: Option<usize>,
    /// Pause between slices in the async driver. Zero just yields to the runtime.
    pub idle_interval: Duration,
    /// How many passes a single `flush` may start before giving up. Guards
    /// against components that request an update on every render.
    pub max_render_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_slice: Duration::from_millis(16),
            yield_threshold: Duration::from_millis(1),
            max_units_per_slice: None,
            idle_interval: Duration::ZERO,
            max_render_passes: 25,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle slice budget (builder).
    pub fn with_time_slice(mut self, time_slice: Duration) -> Self {
        self.time_slice = time_slice;
        self
    }

    /// Set the yield threshold (builder).
    pub fn with_yield_threshold(mut self, threshold: Duration) -> Self {
        self.yield_threshold = threshold;
        self
    }

    /// Cap units per slice (builder).
    pub fn with_max_units_per_slice(mut self, units: usize) -> Self {
        self.max_units_per_slice = Some(units);
        self
    }

    /// Set the pause between driver slices (builder).
    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval = interval;
        self
    }

    /// Set the per-flush pass limit (builder).
    pub fn with_max_render_passes(mut self, passes: usize) -> Self {
        self.max_render_passes = passes;
        self
    }
}
