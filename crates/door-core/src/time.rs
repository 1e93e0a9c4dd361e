//! Host tick model.
//!
//! The host world advances in discrete ticks (20 per second for the default
//! configuration).  Every delay in the engine is expressed in whole ticks so
//! that scheduling arithmetic is exact and comparisons are O(1).

use std::fmt;

/// An absolute host tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self`, or 0 if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Number of whole ticks covering `secs` seconds at `ticks_per_second`.
    ///
    /// Rounds up so a positive duration never collapses to zero ticks.
    pub fn count_for_secs(secs: f64, ticks_per_second: u32) -> u64 {
        if secs <= 0.0 || !secs.is_finite() {
            return 0;
        }
        (secs * ticks_per_second as f64).ceil() as u64
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
