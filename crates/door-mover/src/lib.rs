//! `door-mover` — drives one door animation from block capture to final
//! placement.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`world`]    | `WorldBlockSink`, `EntityAnimationSink`, `World` host traits    |
//! | [`snapshot`] | `BlockSnapshot` — blocks captured when the animation starts     |
//! | [`timing`]   | `AnimationTiming` — duration to step count, speed clamping      |
//! | [`state`]    | `MoverState`, `AbortReason`, `MoverHandle`                      |
//! | [`mover`]    | `Mover`, `ToggleRequest`, `MoverReport`, `CompletionSink`       |
//! | [`memory`]   | `MemoryWorld` — in-memory host world                            |
//! | [`error`]    | `MoverError`, `MoverResult<T>`                                  |
//!
//! # Threading
//!
//! A [`Mover`] itself lives on the host's mutation thread: it is constructed
//! there and every `tick` runs there.  Other threads only ever see its
//! [`MoverHandle`], which can be queried and aborted from anywhere.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                           |
//! |------------|--------------------------------------------------|
//! | `parallel` | Per-tick block poses are computed with Rayon.    |
//! | `serde`    | Forwards to `door-core/serde`.                   |

pub mod error;
pub mod memory;
pub mod mover;
pub mod snapshot;
pub mod state;
pub mod timing;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::{MoverError, MoverResult};
pub use memory::{MemoryEntity, MemoryWorld};
pub use mover::{CompletionSink, Mover, MoverReport, ToggleRequest};
pub use snapshot::{BlockSnapshot, SnapshotBlock};
pub use state::{AbortReason, MoverHandle, MoverState};
pub use timing::AnimationTiming;
pub use world::{EntityAnimationSink, World, WorldBlockSink};
