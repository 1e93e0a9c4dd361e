//! Engine configuration.
//!
//! Typically loaded from a TOML file by `door-engine` and shared read-only by
//! every component.  Components that only need the post-animation delays
//! depend on the narrower [`ConfigSource`] trait.

use crate::{CoreError, CoreResult};

/// Hard floor, in ticks, between the end of an animation and the door
/// becoming available again.  Lets the host settle world state first.
pub const MINIMUM_DOOR_DELAY_TICKS: u64 = 15;

/// Read-only view of the delays the activity manager needs.
pub trait ConfigSource: Send + Sync {
    /// Extra cool-down after an animation, in ticks.
    fn cool_down_ticks(&self) -> u64;

    /// Minimum delay after an animation, in ticks.  Never below
    /// [`MINIMUM_DOOR_DELAY_TICKS`].
    fn minimum_post_animation_delay_ticks(&self) -> u64;

    /// Extra wait, in ticks, before an instantly toggled door is available
    /// again.
    fn skip_animation_delay_ticks(&self) -> u64 {
        0
    }

    /// Delay actually applied before post-animation bookkeeping runs.
    fn post_animation_delay_ticks(&self) -> u64 {
        self.minimum_post_animation_delay_ticks()
            .max(MINIMUM_DOOR_DELAY_TICKS)
            .max(self.cool_down_ticks())
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Host ticks per real second.  Default: 20.
    pub ticks_per_second: u32,

    /// Cool-down after every animation, in ticks.  Default: 0.
    pub cool_down_ticks: u64,

    /// Minimum post-animation delay in ticks.  Values below
    /// [`MINIMUM_DOOR_DELAY_TICKS`] are raised to it.
    pub minimum_post_animation_delay_ticks: u64,

    /// Additional wait before an instantly toggled door is available again,
    /// so scripted callers cannot re-toggle it every tick.  Default: 40.
    pub skip_animation_delay_ticks: u64,

    /// Slowest allowed block speed, blocks per second.
    pub min_speed: f64,

    /// Fastest allowed block speed, blocks per second.
    pub max_speed: f64,

    /// Upper bound on any animation's duration, seconds.
    pub max_duration_secs: f64,

    /// Fraction of the remaining distance covered per tick by an animated
    /// block, in `(0, 1]`.
    pub velocity_damping: f64,

    /// Ticks spent in the finishing state before blocks are placed.
    pub finish_settle_ticks: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ticks_per_second:                   20,
            cool_down_ticks:                    0,
            minimum_post_animation_delay_ticks: MINIMUM_DOOR_DELAY_TICKS,
            skip_animation_delay_ticks:         40,
            min_speed:                          0.1,
            max_speed:                          10.0,
            max_duration_secs:                  60.0,
            velocity_damping:                   0.9,
            finish_settle_ticks:                1,
        }
    }
}

impl EngineConfig {
    /// Reject configurations that would make the animation math degenerate.
    pub fn validate(&self) -> CoreResult<()> {
        if self.ticks_per_second == 0 {
            return Err(CoreError::Config("ticks_per_second must be > 0".into()));
        }
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed) {
            return Err(CoreError::Config(format!(
                "speed bounds must satisfy 0 < min_speed <= max_speed, got {} and {}",
                self.min_speed, self.max_speed
            )));
        }
        if !(self.velocity_damping > 0.0 && self.velocity_damping <= 1.0) {
            return Err(CoreError::Config(format!(
                "velocity_damping must be in (0, 1], got {}",
                self.velocity_damping
            )));
        }
        if self.max_duration_secs <= 0.0 {
            return Err(CoreError::Config("max_duration_secs must be > 0".into()));
        }
        Ok(())
    }
}

impl ConfigSource for EngineConfig {
    fn cool_down_ticks(&self) -> u64 {
        self.cool_down_ticks
    }

    fn minimum_post_animation_delay_ticks(&self) -> u64 {
        self.minimum_post_animation_delay_ticks.max(MINIMUM_DOOR_DELAY_TICKS)
    }

    fn skip_animation_delay_ticks(&self) -> u64 {
        self.skip_animation_delay_ticks
    }
}
