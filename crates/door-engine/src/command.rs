//! Toggle commands and their outcomes.

use door_core::{Actor, Door, DoorActionCause, DoorActionType, DoorId, TypeId};
use door_geometry::GeometryError;
use door_mover::{MoverError, ToggleRequest};

/// A request to move one door.
#[derive(Clone, PartialEq, Debug)]
pub struct ToggleCommand {
    pub door:           DoorId,
    pub action:         DoorActionType,
    pub cause:          DoorActionCause,
    pub actor:          Actor,
    /// Requested animation length; 0 means as fast as allowed.
    pub duration_secs:  f64,
    pub skip_animation: bool,
}

impl ToggleCommand {
    pub fn new(door: DoorId, action: DoorActionType) -> Self {
        Self {
            door,
            action,
            cause: DoorActionCause::default(),
            actor: Actor::default(),
            duration_secs: 0.0,
            skip_animation: false,
        }
    }

    pub fn by(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }

    pub fn cause(mut self, cause: DoorActionCause) -> Self {
        self.cause = cause;
        self
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn skip_animation(mut self, skip: bool) -> Self {
        self.skip_animation = skip;
        self
    }

    pub(crate) fn into_request(self, door: Door) -> ToggleRequest {
        ToggleRequest::new(door, self.action, self.actor)
            .with_cause(self.cause)
            .with_duration(self.duration_secs)
            .skipping_animation(self.skip_animation)
    }
}

/// Result of [`DoorEngine::request_toggle`](crate::DoorEngine::request_toggle).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ToggleOutcome {
    /// A mover was created and will run from the next tick.
    Started,
    /// The door is already animating or settling.
    AlreadyBusy,
    Rejected(RejectReason),
}

impl ToggleOutcome {
    #[inline]
    pub fn is_started(self) -> bool {
        self == ToggleOutcome::Started
    }
}

/// Why a toggle was not started.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RejectReason {
    UnknownDoor,
    UnknownType(TypeId),
    /// The door's archetype differs from its registered type's.
    TypeMismatch(TypeId),
    TypeDisabled(TypeId),
    /// Called off the mutation context.
    WrongExecutionContext,
    /// Opening an open door or closing a closed one.
    AlreadyInState,
    UnsupportedDirection,
    /// The door cannot be animated as stored (no blocks, bad parameters).
    InvalidGeometry,
    /// The claim was swept away by a stop before the mover was attached.
    Interrupted,
}

impl From<&MoverError> for RejectReason {
    fn from(e: &MoverError) -> Self {
        match e {
            MoverError::Geometry(GeometryError::AlreadyInState { .. }) => RejectReason::AlreadyInState,
            MoverError::Geometry(GeometryError::UnsupportedDirection { .. }) => RejectReason::UnsupportedDirection,
            MoverError::Geometry(GeometryError::InvalidParameter { .. })
            | MoverError::InvalidGeometryPrecondition { .. } => RejectReason::InvalidGeometry,
        }
    }
}
