//! `door-engine` — the door movement engine as hosts see it.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`engine`]     | `DoorEngine` — toggles, host tick driver, queries, types      |
//! | [`builder`]    | `DoorEngineBuilder`                                           |
//! | [`command`]    | `ToggleCommand`, `ToggleOutcome`, `RejectReason`              |
//! | [`auto_close`] | `AutoCloseQueue` — built-in auto-close timer                  |
//! | [`config`]     | `load_config`, `config_from_str` (TOML)                       |
//! | [`error`]      | `EngineError`, `EngineResult<T>`                              |
//!
//! # Per-tick flow
//!
//! ```text
//! host tick ──► DoorEngine::tick(world)
//!                 1. TickScheduler::advance   post-animation bookkeeping
//!                 2. AutoCloseQueue::take_due close requests
//!                 3. Mover::tick × live       block animation
//! ```

pub mod auto_close;
mod book;
pub mod builder;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;


pub use auto_close::{AutoCloseQueue, PendingClose};
pub use builder::{DoorEngineBuilder, DEFAULT_RECENT_TOGGLE_TTL};
pub use command::{RejectReason, ToggleCommand, ToggleOutcome};
pub use config::{config_from_str, load_config};
pub use engine::DoorEngine;
pub use error::{EngineError, EngineResult};
