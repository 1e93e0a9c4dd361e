//! `door-geometry` — how the blocks of each door archetype move.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`trajectory`]  | `Trajectory` trait, `BlockOrigin`, `Geometry` tagged enum  |
//! | [`cylindrical`] | `CylindricalGeometry` — turn about a vertical axis         |
//! | [`horizontal`]  | `HorizontalAxisGeometry` — turn about a horizontal axis    |
//! | [`linear`]      | `LinearGeometry` — straight translation                    |
//! | [`garage`]      | `GarageGeometry` — L-shaped rail                           |
//! | [`flag`]        | `FlagGeometry` — travelling wave, no net movement          |
//! | [`plan`]        | `plan_geometry(door, action)`, `is_open_after`             |
//! | [`error`]       | `GeometryError`, `GeometryResult<T>`                       |
//!
//! | Archetype   | Engine                   | Motion per toggle                         |
//! |-------------|--------------------------|-------------------------------------------|
//! | BigDoor     | `CylindricalGeometry`    | one quarter turn                          |
//! | Revolving   | `CylindricalGeometry`    | `quarter_circles` quarter turns           |
//! | Drawbridge  | `HorizontalAxisGeometry` | one quarter turn, tipping towards the direction |
//! | Clock       | `HorizontalAxisGeometry` | `quarter_turns` quarter turns             |
//! | Sliding     | `LinearGeometry`         | `blocks_to_move` blocks                   |
//! | Garage      | `GarageGeometry`         | door height along the rail                |
//! | Flag        | `FlagGeometry`           | `waves` waves, back to the start          |
//!
//! Engines are pure functions of a block's captured [`BlockOrigin`] and the
//! animation progress; nothing here touches the world.

pub mod cylindrical;
pub mod error;
pub mod flag;
pub mod garage;
pub mod horizontal;
pub mod linear;
pub mod plan;
pub mod trajectory;


pub use cylindrical::CylindricalGeometry;
pub use error::{GeometryError, GeometryResult};
pub use flag::FlagGeometry;
pub use garage::GarageGeometry;
pub use horizontal::HorizontalAxisGeometry;
pub use linear::LinearGeometry;
pub use plan::{is_open_after, plan_geometry};
pub use trajectory::{BlockOrigin, Geometry, Trajectory};
