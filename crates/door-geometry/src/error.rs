//! Geometry planning errors.

use thiserror::Error;

use door_core::{Archetype, DoorActionType, DoorId, RotateDirection};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{archetype} doors cannot move {direction}")]
    UnsupportedDirection {
        archetype: Archetype,
        direction: RotateDirection,
    },

    #[error("door {door} cannot {action}: it is already in that state")]
    AlreadyInState {
        door:   DoorId,
        action: DoorActionType,
    },

    #[error("invalid {archetype} parameter: {reason}")]
    InvalidParameter {
        archetype: Archetype,
        reason:    String,
    },
}

pub type GeometryResult<T> = Result<T, GeometryError>;
