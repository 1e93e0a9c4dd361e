//! The exposed engine API.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use door_activity::{ActivityManager, Restartable, TickScheduler, ToggleEnd, WorldMutationScheduler};
use door_core::{Door, DoorActionCause, DoorId, EngineConfig, Tick, ToggleAction, TypeId};
use door_mover::{Mover, MoverError, MoverHandle, World};
use door_types::{RegistrationResult, TypeDescriptor, TypeRegistry};

use crate::book::DoorBook;
use crate::{AutoCloseQueue, EngineResult, RejectReason, ToggleCommand, ToggleOutcome};

/// Door movement engine.
///
/// Built with [`DoorEngineBuilder`](crate::DoorEngineBuilder) on the host's
/// mutation thread.  Queries and type registration work from any thread;
/// [`request_toggle`][Self::request_toggle] and [`tick`][Self::tick] must be
/// called on the mutation thread.
pub struct DoorEngine {
    pub(crate) config:     Arc<EngineConfig>,
    pub(crate) scheduler:  Arc<TickScheduler>,
    pub(crate) activity:   ActivityManager,
    pub(crate) types:      TypeRegistry,
    pub(crate) book:       Arc<DoorBook>,
    /// `None` when the host supplied its own auto-close scheduler.
    pub(crate) auto_close: Option<Arc<AutoCloseQueue>>,
    pub(crate) live:       Mutex<Vec<Mover>>,
}

impl DoorEngine {
    // ── Toggling ──────────────────────────────────────────────────────────

    /// Start moving a door.
    ///
    /// The door is claimed before anything else happens, so concurrent
    /// requests for one door see exactly one `Started`.  The mover is built
    /// here but touches the world only from the next [`tick`][Self::tick].
    pub fn request_toggle<W: World + ?Sized>(&self, world: &mut W, command: ToggleCommand) -> ToggleOutcome {
        let id = command.door;
        let Some(door) = self.book.door(id) else {
            return ToggleOutcome::Rejected(RejectReason::UnknownDoor);
        };
        if let Err(reason) = self.check_type(&door) {
            debug!(door = %id, ?reason, "toggle rejected");
            return ToggleOutcome::Rejected(reason);
        }

        if !self.activity.try_mark_busy(id) {
            debug!(door = %id, "toggle ignored: door busy");
            return ToggleOutcome::AlreadyBusy;
        }
        if self.activity.require_mutation_context(id, "request_toggle").is_err() {
            return ToggleOutcome::Rejected(RejectReason::WrongExecutionContext);
        }

        let cause = command.cause;
        let completion = Arc::new(self.activity.clone());
        let mover = match Mover::new(command.into_request(door), world, &self.config, completion) {
            Ok(mover) => mover,
            Err(e) => {
                self.activity.mark_available(id);
                match &e {
                    MoverError::InvalidGeometryPrecondition { .. } => error!(door = %id, error = %e, "mover failed"),
                    MoverError::Geometry(_) => debug!(door = %id, error = %e, "toggle rejected"),
                }
                return ToggleOutcome::Rejected(RejectReason::from(&e));
            }
        };

        if self.activity.attach_mover(id, mover.handle().clone()).is_err() {
            return ToggleOutcome::Rejected(RejectReason::Interrupted);
        }
        if cause != DoorActionCause::AutoClose {
            if let Some(queue) = &self.auto_close {
                queue.cancel(id);
            }
        }
        debug!(door = %id, ?cause, steps = mover.timing().total_steps, "toggle started");
        self.live.lock().push(mover);
        ToggleOutcome::Started
    }

    /// Toggle a door whose redstone input changed.  `None` if the change
    /// calls for no movement.
    pub fn on_redstone_change<W: World + ?Sized>(
        &self,
        world:   &mut W,
        door:    DoorId,
        current: u32,
    ) -> Option<ToggleOutcome> {
        let Some(record) = self.book.door(door) else {
            return Some(ToggleOutcome::Rejected(RejectReason::UnknownDoor));
        };
        let action = ToggleAction::for_redstone(record.is_open, current)?;
        let command = ToggleCommand::new(door, action).cause(DoorActionCause::Redstone);
        Some(self.request_toggle(world, command))
    }

    /// Abort the mover of `door`, if any.  Callable from any thread.
    pub fn abort(&self, door: DoorId) -> bool {
        self.activity.get_mover(door).is_some_and(|h| h.abort())
    }

    fn check_type(&self, door: &Door) -> Result<(), RejectReason> {
        let Some(descriptor) = self.types.get_by_id(door.type_id) else {
            return Err(RejectReason::UnknownType(door.type_id));
        };
        if descriptor.archetype != door.archetype() {
            return Err(RejectReason::TypeMismatch(door.type_id));
        }
        if !self.types.is_enabled(door.type_id) {
            return Err(RejectReason::TypeDisabled(door.type_id));
        }
        Ok(())
    }

    // ── Host driver ───────────────────────────────────────────────────────

    /// Per-tick entry point; mutation thread only.
    ///
    /// Runs due bookkeeping, fires due auto-closes, then advances every live
    /// mover one step.  Returns how many movers are still live.
    pub fn tick<W: World + ?Sized>(&self, world: &mut W) -> EngineResult<usize> {
        self.scheduler.advance()?;

        if let Some(queue) = &self.auto_close {
            for close in queue.take_due(self.scheduler.now()) {
                let outcome = self.request_toggle(world, close.command());
                debug!(door = %close.door, ?outcome, "auto-close");
            }
        }

        let mut live = self.live.lock();
        for mover in live.iter_mut() {
            mover.tick(world);
        }
        live.retain(|m| !m.is_finished());
        Ok(live.len())
    }

    /// Current host tick.
    pub fn now(&self) -> Tick {
        self.scheduler.now()
    }

    /// Movers still being driven, including aborted ones awaiting cleanup.
    pub fn live_movers(&self) -> usize {
        self.live.lock().len()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` while the door is animating or settling afterwards.
    pub fn query_busy(&self, door: DoorId) -> bool {
        self.activity.is_busy(door)
    }

    pub fn mover(&self, door: DoorId) -> Option<MoverHandle> {
        self.activity.get_mover(door)
    }

    /// The last completed toggle of `door`, while it is still remembered.
    pub fn last_toggle(&self, door: DoorId) -> Option<Arc<ToggleEnd>> {
        self.book.last_toggle(door)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn activity(&self) -> &ActivityManager {
        &self.activity
    }

    /// Pending automatic closes, if the built-in timer is in use.
    pub fn auto_close_queue(&self) -> Option<&AutoCloseQueue> {
        self.auto_close.as_deref()
    }

    pub fn is_mutation_context(&self) -> bool {
        self.scheduler.is_mutation_context()
    }

    // ── Door records ──────────────────────────────────────────────────────

    /// Add or replace a door record.  Records are updated by the engine
    /// after every movement.
    pub fn add_door(&self, door: Door) -> Option<Door> {
        self.book.insert(door)
    }

    pub fn remove_door(&self, door: DoorId) -> Option<Door> {
        if let Some(queue) = &self.auto_close {
            queue.cancel(door);
        }
        self.book.remove(door)
    }

    pub fn door(&self, id: DoorId) -> Option<Door> {
        self.book.door(id)
    }

    /// Ids of all known doors, ascending.
    pub fn door_ids(&self) -> Vec<DoorId> {
        self.book.ids()
    }

    pub fn door_count(&self) -> usize {
        self.book.len()
    }

    // ── Types ─────────────────────────────────────────────────────────────

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn register_door_type(&self, descriptor: TypeDescriptor) -> RegistrationResult<TypeId> {
        self.types.register(descriptor, true)
    }

    pub fn register_door_type_batch(
        &self,
        descriptors: Vec<TypeDescriptor>,
    ) -> Vec<RegistrationResult<TypeId>> {
        self.types.register_batch(descriptors)
    }

    /// Load type descriptors from a CSV file and register them as one batch.
    pub fn load_door_types_csv(
        &self,
        path: &Path,
    ) -> RegistrationResult<Vec<RegistrationResult<TypeId>>> {
        let descriptors = door_types::load_descriptors_csv(path)?;
        let results = self.types.register_batch(descriptors);
        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = results.len(), "some door types failed to register");
        } else {
            info!(total = results.len(), "door types loaded");
        }
        Ok(results)
    }
}

impl Restartable for DoorEngine {
    /// Abort every mover and forget pending auto-closes.  Aborted movers put
    /// their blocks down on the next tick.
    fn restart(&self) {
        let stopped = self.activity.restart_all();
        if let Some(queue) = &self.auto_close {
            queue.clear();
        }
        info!(stopped, "engine restarted");
    }

    fn shutdown(&self) {
        let stopped = self.activity.shutdown_all();
        if let Some(queue) = &self.auto_close {
            queue.clear();
        }
        info!(stopped, "engine shut down");
    }
}
