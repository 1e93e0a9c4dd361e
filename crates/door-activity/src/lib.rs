//! `door-activity` — which doors are animating, and what happens when they
//! stop.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                          |
//! |----------------|-------------------------------------------------------------------|
//! | [`manager`]    | `ActivityManager` — busy table, completion bookkeeping, teardown  |
//! | [`scheduler`]  | `WorldMutationScheduler` trait, `TickScheduler`, `Task`           |
//! | [`task_queue`] | `TaskQueue<T>` (`BTreeMap<Tick, Vec<T>>`)                         |
//! | [`sinks`]      | `ToggleEventSink`, `ToggleEnd`, `AutoCloseScheduler`, `Restartable` |
//! | [`error`]      | `ActivityError`, `ActivityResult<T>`                              |
//!
//! # Threading
//!
//! The busy table can be read and claimed from any thread.  Completion
//! bookkeeping is always deferred through the [`WorldMutationScheduler`], so
//! event sinks and the auto-close scheduler are only ever called on the
//! mutation context.

pub mod error;
pub mod manager;
pub mod scheduler;
pub mod sinks;
pub mod task_queue;

#[cfg(test)]
mod tests;

pub use error::{ActivityError, ActivityResult};
pub use manager::ActivityManager;
pub use scheduler::{Task, TickScheduler, WorldMutationScheduler};
pub use sinks::{AutoCloseScheduler, Restartable, ToggleEnd, ToggleEventSink};
pub use task_queue::TaskQueue;
