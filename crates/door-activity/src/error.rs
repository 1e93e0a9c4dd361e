//! Activity-manager errors.

use thiserror::Error;

use door_core::DoorId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivityError {
    /// A mover was attached to a door that was never marked busy.
    #[error("door {0} is not marked busy")]
    NotBusy(DoorId),

    /// World mutation attempted off the host's mutation thread.
    #[error("{operation} must run on the mutation context")]
    WrongExecutionContext { operation: &'static str },
}

pub type ActivityResult<T> = Result<T, ActivityError>;
