//! Built-in auto-close timer.
//!
//! Completed openings of timer-toggleable doors with an `auto_close_secs`
//! are queued here; [`DoorEngine::tick`](crate::DoorEngine::tick) turns due
//! entries into `Close` requests with cause `AutoClose`.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use door_activity::{AutoCloseScheduler, TaskQueue, TickScheduler};
use door_core::{Actor, Door, DoorActionCause, DoorActionType, DoorId, Tick};

use crate::ToggleCommand;

/// A queued automatic close.
#[derive(Clone, PartialEq, Debug)]
pub struct PendingClose {
    pub door:           DoorId,
    pub actor:          Actor,
    pub duration_secs:  f64,
    pub skip_animation: bool,
}

impl PendingClose {
    pub fn command(&self) -> ToggleCommand {
        ToggleCommand::new(self.door, DoorActionType::Close)
            .by(self.actor.clone())
            .cause(DoorActionCause::AutoClose)
            .duration(self.duration_secs)
            .skip_animation(self.skip_animation)
    }
}

pub struct AutoCloseQueue {
    clock:            Arc<TickScheduler>,
    ticks_per_second: u32,
    queue:            Mutex<TaskQueue<PendingClose>>,
}

impl AutoCloseQueue {
    pub fn new(clock: Arc<TickScheduler>, ticks_per_second: u32) -> Self {
        Self { clock, ticks_per_second, queue: Mutex::new(TaskQueue::new()) }
    }

    /// Remove and return every close due at or before `now`.
    pub fn take_due(&self, now: Tick) -> Vec<PendingClose> {
        self.queue.lock().drain_due(now)
    }

    /// Drop any pending close for `door`.
    pub fn cancel(&self, door: DoorId) -> usize {
        self.queue.lock().remove_where(|p| p.door == door)
    }

    pub fn clear(&self) {
        self.queue.lock().clear();
    }

    pub fn next_due(&self) -> Option<Tick> {
        self.queue.lock().next_tick()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl AutoCloseScheduler for AutoCloseQueue {
    fn schedule_auto_close(&self, actor: &Actor, door: &Door, duration_secs: f64, skip_animation: bool) {
        if !door.is_open {
            return;
        }
        let Some(secs) = door.kind.auto_close_secs() else {
            return;
        };
        let due = self.clock.now().offset(Tick::count_for_secs(f64::from(secs), self.ticks_per_second));

        let mut queue = self.queue.lock();
        queue.remove_where(|p| p.door == door.id);
        queue.push(due, PendingClose {
            door: door.id,
            actor: actor.clone(),
            duration_secs,
            skip_animation,
        });
        debug!(door = %door.id, %due, "auto-close scheduled");
    }
}
