//! Animation timing.
//!
//! A requested duration is turned into a whole number of steps, one per host
//! tick.  The duration is first bent so that the fastest block moves no
//! slower than `min_speed` and no faster than `max_speed`, then capped at
//! `max_duration_secs`.

use door_core::{EngineConfig, Tick};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AnimationTiming {
    /// Effective duration after speed clamping, in seconds.
    pub duration_secs: f64,
    /// Interpolation steps before the mover starts finishing.  At least 1.
    pub total_steps:   u64,
}

impl AnimationTiming {
    /// Timing for an animation whose furthest-travelling block covers
    /// `max_distance` blocks.
    ///
    /// A non-positive or non-finite request means "as fast as allowed".
    pub fn compute(requested_secs: f64, max_distance: f64, config: &EngineConfig) -> Self {
        let fastest = if max_distance > 0.0 { max_distance / config.max_speed } else { 0.0 };
        let slowest = if max_distance > 0.0 { max_distance / config.min_speed } else { config.max_duration_secs };

        let requested = if requested_secs.is_finite() && requested_secs > 0.0 {
            requested_secs
        } else {
            fastest
        };
        let duration_secs = requested.clamp(fastest, slowest.max(fastest)).min(config.max_duration_secs);
        let total_steps = Tick::count_for_secs(duration_secs, config.ticks_per_second).max(1);

        Self { duration_secs, total_steps }
    }

    /// Step at which rotated blocks swap their visual representation.
    #[inline]
    pub fn replace_step(&self) -> u64 {
        (self.total_steps / 2).max(1)
    }

    /// Progress in `[0, 1]` after `step` steps.
    #[inline]
    pub fn progress(&self, step: u64) -> f64 {
        (step as f64 / self.total_steps as f64).min(1.0)
    }
}
