//! `door-cache` — generic expiring key/value store.
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`cache`]   | `TimedCache`, `TimedCacheBuilder`, `Retention`            |
//! | [`clock`]   | `CacheClock` trait, `SystemClock`, `ManualClock`          |
//! | [`error`]   | `CacheError`, `CacheResult<T>`                            |
//!
//! Not door-specific; the engine uses it for per-door lookups that should
//! fade out on their own.

pub mod cache;
pub mod clock;
pub mod error;
mod sweeper;


pub use cache::{Retention, TimedCache, TimedCacheBuilder};
pub use clock::{CacheClock, ManualClock, SystemClock};
pub use error::{CacheError, CacheResult};
