//! Mover construction errors.

use thiserror::Error;

use door_core::DoorId;
use door_geometry::GeometryError;

#[derive(Debug, Error)]
pub enum MoverError {
    /// The animation cannot run with the captured blocks (for example a door
    /// whose cuboid holds nothing but air).
    #[error("invalid geometry for door {door}: {reason}")]
    InvalidGeometryPrecondition { door: DoorId, reason: String },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

pub type MoverResult<T> = Result<T, MoverError>;
