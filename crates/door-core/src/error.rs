//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface it.

use thiserror::Error;

use crate::{DoorId, RotateDirection};

/// Errors raised while validating core data (door records, configuration).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("door {0} not found")]
    DoorNotFound(DoorId),

    #[error("open direction {direction} is not valid for a {archetype} door")]
    InvalidDirection {
        direction: RotateDirection,
        archetype: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `door-core`.
pub type CoreResult<T> = Result<T, CoreError>;
