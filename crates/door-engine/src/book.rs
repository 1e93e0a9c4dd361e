//! Door records known to the engine, and the most recent toggle of each.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use door_activity::{ToggleEnd, ToggleEventSink};
use door_cache::TimedCache;
use door_core::{Door, DoorId};
use door_mover::AbortReason;

pub(crate) struct DoorBook {
    doors:  RwLock<FxHashMap<DoorId, Door>>,
    recent: TimedCache<DoorId, ToggleEnd>,
}

impl DoorBook {
    pub(crate) fn new(recent: TimedCache<DoorId, ToggleEnd>) -> Self {
        Self { doors: RwLock::new(FxHashMap::default()), recent }
    }

    pub(crate) fn door(&self, id: DoorId) -> Option<Door> {
        self.doors.read().get(&id).cloned()
    }

    pub(crate) fn insert(&self, door: Door) -> Option<Door> {
        self.doors.write().insert(door.id, door)
    }

    pub(crate) fn remove(&self, id: DoorId) -> Option<Door> {
        self.recent.remove(&id);
        self.doors.write().remove(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.doors.read().len()
    }

    pub(crate) fn ids(&self) -> Vec<DoorId> {
        let mut ids: Vec<DoorId> = self.doors.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn last_toggle(&self, id: DoorId) -> Option<Arc<ToggleEnd>> {
        self.recent.get(&id)
    }

    /// Store the door's post-movement record.  Doors removed while they were
    /// moving stay removed.
    fn update(&self, event: &ToggleEnd) {
        if let Some(door) = self.doors.write().get_mut(&event.door_id) {
            *door = event.door.clone();
            debug!(door = %event.door_id, cuboid = %event.door.cuboid, open = event.door.is_open, "door updated");
        }
    }
}

/// Keeps the [`DoorBook`] current, then forwards to the host's sink.
pub(crate) struct EngineEvents {
    pub(crate) book:       Arc<DoorBook>,
    pub(crate) downstream: Arc<dyn ToggleEventSink>,
}

impl ToggleEventSink for EngineEvents {
    fn emit_toggle_end(&self, event: &ToggleEnd) {
        self.book.update(event);
        self.book.recent.put(event.door_id, event.clone());
        self.downstream.emit_toggle_end(event);
    }

    fn emit_mover_stopped(&self, event: &ToggleEnd, reason: AbortReason) {
        self.book.update(event);
        self.downstream.emit_mover_stopped(event, reason);
    }
}
