//! Host collaborators notified after an animation.

use door_core::{Actor, Door, DoorActionCause, DoorActionType, DoorId};
use door_mover::{AbortReason, MoverReport};

/// Emitted when a door has finished moving.
#[derive(Clone, PartialEq, Debug)]
pub struct ToggleEnd {
    pub door_id:       DoorId,
    /// Door record after the movement.
    pub door:          Door,
    pub cause:         DoorActionCause,
    pub action:        DoorActionType,
    pub actor:         Actor,
    pub duration_secs: f64,
    pub skipped:       bool,
}

impl From<&MoverReport> for ToggleEnd {
    fn from(report: &MoverReport) -> Self {
        ToggleEnd {
            door_id:       report.door.id,
            door:          report.door.clone(),
            cause:         report.cause,
            action:        report.action,
            actor:         report.actor.clone(),
            duration_secs: report.duration_secs,
            skipped:       report.skipped,
        }
    }
}

/// Receives toggle lifecycle events.
pub trait ToggleEventSink: Send + Sync {
    fn emit_toggle_end(&self, event: &ToggleEnd);

    /// A mover was aborted, restarted or shut down before completing.
    /// `event.door` holds wherever the blocks were put down.
    fn emit_mover_stopped(&self, _event: &ToggleEnd, _reason: AbortReason) {}
}

impl ToggleEventSink for () {
    fn emit_toggle_end(&self, _event: &ToggleEnd) {}
}

/// Re-triggers a close after a timer-toggleable door finished moving.
///
/// Called once per completed animation of a timer-toggleable door; the
/// scheduler decides from `door` whether a close is actually due.
pub trait AutoCloseScheduler: Send + Sync {
    fn schedule_auto_close(&self, actor: &Actor, door: &Door, duration_secs: f64, skip_animation: bool);
}

impl AutoCloseScheduler for () {
    fn schedule_auto_close(&self, _actor: &Actor, _door: &Door, _duration_secs: f64, _skip_animation: bool) {}
}

/// Components that can be reset or torn down as a whole.
pub trait Restartable {
    /// Return to a fresh state; live work is abandoned.
    fn restart(&self);

    /// Stop permanently.
    fn shutdown(&self);
}
