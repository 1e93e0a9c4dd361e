//! The busy table and post-animation bookkeeping.
//!
//! ```text
//! try_mark_busy ──► attach_mover ──► (mover ticks) ──► on_mover_finished
//!   placeholder        live handle                          │ delay
//!                                                           ▼
//!                                  release entry, emit event, auto-close
//! ```
//!
//! A door is busy while it has an entry, placeholder or live handle.  The
//! placeholder lets a request claim the door atomically before the slow,
//! fallible mover construction starts.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, error};

use door_core::{ConfigSource, DoorId};
use door_mover::{AbortReason, CompletionSink, MoverHandle, MoverReport};

use crate::{
    ActivityError, ActivityResult, AutoCloseScheduler, Restartable, ToggleEnd, ToggleEventSink,
    WorldMutationScheduler,
};

type BusyTable = FxHashMap<DoorId, Option<MoverHandle>>;

struct Inner {
    busy:       RwLock<BusyTable>,
    scheduler:  Arc<dyn WorldMutationScheduler>,
    events:     Arc<dyn ToggleEventSink>,
    auto_close: Arc<dyn AutoCloseScheduler>,
    config:     Arc<dyn ConfigSource>,
}

/// Which doors are animating, and what happens when they stop.
///
/// Cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct ActivityManager {
    inner: Arc<Inner>,
}

impl ActivityManager {
    pub fn new(
        scheduler:  Arc<dyn WorldMutationScheduler>,
        events:     Arc<dyn ToggleEventSink>,
        auto_close: Arc<dyn AutoCloseScheduler>,
        config:     Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                busy: RwLock::new(BusyTable::default()),
                scheduler,
                events,
                auto_close,
                config,
            }),
        }
    }

    // ── Busy table ────────────────────────────────────────────────────────

    /// Claim `door`.  Returns `true` iff this call inserted the entry; any
    /// number of concurrent callers see exactly one `true`.
    pub fn try_mark_busy(&self, door: DoorId) -> bool {
        match self.inner.busy.write().entry(door) {
            Entry::Vacant(slot) => {
                slot.insert(None);
                debug!(%door, "marked busy");
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Release `door` unconditionally.  Idempotent.
    pub fn mark_available(&self, door: DoorId) {
        if self.inner.busy.write().remove(&door).is_some() {
            debug!(%door, "marked available");
        }
    }

    /// Store the live mover for a door claimed with
    /// [`try_mark_busy`][Self::try_mark_busy].
    ///
    /// Fails with [`ActivityError::NotBusy`] when the claim is gone, which
    /// happens when a stop or restart sweeps the table between claim and
    /// attach.  The caller drops the mover.
    pub fn attach_mover(&self, door: DoorId, mover: MoverHandle) -> ActivityResult<()> {
        match self.inner.busy.write().get_mut(&door) {
            Some(slot) => {
                *slot = Some(mover);
                Ok(())
            }
            None => {
                debug!(%door, "claim swept before the mover was attached");
                Err(ActivityError::NotBusy(door))
            }
        }
    }

    pub fn is_busy(&self, door: DoorId) -> bool {
        self.inner.busy.read().contains_key(&door)
    }

    /// Live mover of `door`, if one has been attached.
    pub fn get_mover(&self, door: DoorId) -> Option<MoverHandle> {
        self.inner.busy.read().get(&door).cloned().flatten()
    }

    /// Number of busy doors.
    pub fn busy_count(&self) -> usize {
        self.inner.busy.read().len()
    }

    /// Fail closed when not on the mutation context: `door` is released and
    /// the caller gets an error instead of a half-built mover.
    pub fn require_mutation_context(&self, door: DoorId, operation: &'static str) -> ActivityResult<()> {
        if self.inner.scheduler.is_mutation_context() {
            return Ok(());
        }
        self.mark_available(door);
        error!(%door, operation, "called off the mutation context");
        Err(ActivityError::WrongExecutionContext { operation })
    }

    // ── Bulk teardown ─────────────────────────────────────────────────────

    /// Abort every live mover and clear the table.  Does not wait for the
    /// movers to acknowledge.  Returns how many movers were signalled.
    pub fn stop_all(&self) -> usize {
        self.sweep(AbortReason::Abort)
    }

    pub fn restart_all(&self) -> usize {
        self.sweep(AbortReason::Restart)
    }

    pub fn shutdown_all(&self) -> usize {
        self.sweep(AbortReason::Shutdown)
    }

    fn sweep(&self, reason: AbortReason) -> usize {
        let table = std::mem::take(&mut *self.inner.busy.write());
        let mut signalled = 0;
        for handle in table.into_values().flatten() {
            let stopped = match reason {
                AbortReason::Abort    => handle.abort(),
                AbortReason::Restart  => handle.restart(),
                AbortReason::Shutdown => handle.shutdown(),
            };
            if stopped {
                signalled += 1;
            }
        }
        debug!(?reason, signalled, "busy table cleared");
        signalled
    }
}

impl Inner {
    /// Post-animation bookkeeping; runs on the mutation context after the
    /// settle delay.
    fn complete(&self, mover: &MoverHandle, report: MoverReport, allow_reschedule: bool) {
        let door = mover.door_id();
        {
            let mut busy = self.busy.write();
            // A newer request may own the entry after a stop_all.
            let owned = matches!(busy.get(&door), Some(Some(h)) if h.same_mover(mover));
            if owned {
                busy.remove(&door);
                debug!(%door, "released after animation");
            }
        }

        let event = ToggleEnd::from(&report);
        if let Some(reason) = report.aborted {
            self.events.emit_mover_stopped(&event, reason);
            return;
        }
        if !allow_reschedule {
            return;
        }
        self.events.emit_toggle_end(&event);
        if report.door.archetype().is_timer_toggleable() {
            self.auto_close
                .schedule_auto_close(&report.actor, &report.door, report.duration_secs, report.skipped);
        }
    }
}

impl CompletionSink for ActivityManager {
    fn on_mover_finished(&self, mover: &MoverHandle, report: MoverReport, allow_reschedule: bool) {
        let config = &self.inner.config;
        let mut delay = config.post_animation_delay_ticks();
        if report.skipped {
            delay += config.skip_animation_delay_ticks();
        }
        debug!(door = %mover.door_id(), delay, allow_reschedule, "mover finished");

        let inner = Arc::clone(&self.inner);
        let mover = mover.clone();
        self.inner.scheduler.run_on_mutation_context_later(
            Box::new(move || inner.complete(&mover, report, allow_reschedule)),
            delay,
        );
    }
}

impl Restartable for ActivityManager {
    fn restart(&self) {
        self.restart_all();
    }

    fn shutdown(&self) {
        self.shutdown_all();
    }
}
