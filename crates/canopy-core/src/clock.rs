#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::TickContext;

/// Per-agent simulation clock.
///
/// The clock is advanced once per frame by the host; nodes only read it. `delta_seconds` is the
/// time covered by the current step, already multiplied by the agent's own time scale and (unless
/// ignored) the global one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Clock {
    delta_seconds: f32,
    accum_seconds: f32,
    time_scale: f32,
    ignore_global_time_scale: bool,
    ticks: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            delta_seconds: 0.0,
            accum_seconds: 0.0,
            time_scale: 1.0,
            ignore_global_time_scale: false,
            ticks: 0,
        }
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, frame: &TickContext) {
        self.advance(frame.dt_seconds, frame.time_scale);
    }

    /// Advance by one frame of `dt_seconds` under the given global time scale.
    ///
    /// Negative inputs are treated as zero so the accumulated time never runs backwards.
    pub fn advance(&mut self, dt_seconds: f32, global_time_scale: f32) {
        let global = if self.ignore_global_time_scale {
            1.0
        } else {
            global_time_scale.max(0.0)
        };
        let delta = dt_seconds.max(0.0) * self.time_scale * global;
        self.delta_seconds = delta;
        self.accum_seconds += delta;
        self.ticks = self.ticks.wrapping_add(1);
    }

    /// Add time from frames that advanced the clock without stepping a tree to the current delta.
    ///
    /// `accum_seconds` already contains that time and is left untouched.
    pub fn fold_skipped(&mut self, seconds: f32) {
        self.delta_seconds += seconds.max(0.0);
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds
    }

    pub fn accum_seconds(&self) -> f32 {
        self.accum_seconds
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, factor: f32) {
        self.time_scale = factor.max(0.0);
    }

    pub fn ignores_global_time_scale(&self) -> bool {
        self.ignore_global_time_scale
    }

    pub fn set_ignore_global_time_scale(&mut self, ignore: bool) {
        self.ignore_global_time_scale = ignore;
    }

    /// Zero the elapsed time and tick count; scaling settings are kept.
    pub fn reset(&mut self) {
        self.delta_seconds = 0.0;
        self.accum_seconds = 0.0;
        self.ticks = 0;
    }
}
