//! `door-core` — foundational types for the door animation engine.
//!
//! This crate is a dependency of every other `door-*` crate.  It has no
//! `door-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`ids`]     | `DoorId`, `TypeId`, `EntityId`                              |
//! | [`vector`]  | `Vector3Di`, `Vector3Dd`, `Cuboid`, `Axis`                  |
//! | [`time`]    | `Tick`                                                      |
//! | [`block`]   | `Direction`, `Orientation`, `BlockData`, `RotationClass`    |
//! | [`action`]  | `DoorActionType`, `DoorActionCause`, `RotateDirection`, `Actor` |
//! | [`door`]    | `Archetype`, `DoorKind`, `Door`                             |
//! | [`config`]  | `EngineConfig`, `ConfigSource`                              |
//! | [`error`]   | `CoreError`, `CoreResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public data types.       |
//!
//! `door-engine` enables `serde` for its TOML configuration loader.

pub mod action;
pub mod block;
pub mod config;
pub mod door;
pub mod error;
pub mod ids;
pub mod time;
pub mod vector;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use action::{Actor, DoorActionCause, DoorActionType, RotateDirection, ToggleAction};
pub use block::{BlockData, Direction, Orientation, RotationClass};
pub use config::{ConfigSource, EngineConfig, MINIMUM_DOOR_DELAY_TICKS};
pub use door::{Archetype, Door, DoorKind};
pub use error::{CoreError, CoreResult};
pub use ids::{DoorId, EntityId, TypeId};
pub use time::Tick;
pub use vector::{Axis, Cuboid, Vector3Dd, Vector3Di};
