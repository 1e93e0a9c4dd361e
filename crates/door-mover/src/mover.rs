//! The per-animation driver.
//!
//! A [`Mover`] is built on the mutation context, captures its door's blocks,
//! and is then advanced one step per host tick by [`Mover::tick`]:
//!
//! 1. `Pending`: the first tick clears the original cells and spawns one
//!    transient entity per block.  In skip-animation mode it goes straight to
//!    `Finishing` and places the blocks in the same tick.
//! 2. `Animating`: each tick steers every entity towards its pose at the
//!    current progress.  Half way through, turned blocks get a new entity
//!    showing their final block state.
//! 3. `Finishing`: velocities are zeroed for `finish_settle_ticks`, then every
//!    block is written to its exact final cell.
//!
//! An abort requested through the [`MoverHandle`] is noticed at the next tick.
//! Blocks already lifted out of the world are then put down at their final
//! cells so nothing is lost.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use door_core::{
    Actor, Cuboid, Door, DoorActionCause, DoorActionType, DoorId, EngineConfig, EntityId,
    RotationClass, Vector3Dd,
};
use door_geometry::{is_open_after, plan_geometry, Geometry, Trajectory};

use crate::{
    AbortReason, AnimationTiming, BlockSnapshot, EntityAnimationSink, MoverHandle, MoverResult, MoverState,
    SnapshotBlock, World,
};

// ── Request / report ──────────────────────────────────────────────────────────

/// A toggle a mover carries out.
#[derive(Clone, PartialEq, Debug)]
pub struct ToggleRequest {
    /// Door record as it was when the toggle was accepted.
    pub door:           Door,
    /// Requested action; `Toggle` is resolved against `door.is_open`.
    pub action:         DoorActionType,
    pub cause:          DoorActionCause,
    pub actor:          Actor,
    /// Requested animation length in seconds.
    pub duration_secs:  f64,
    pub skip_animation: bool,
}

impl ToggleRequest {
    pub fn new(door: Door, action: DoorActionType, actor: Actor) -> Self {
        Self {
            door,
            action,
            cause: DoorActionCause::default(),
            actor,
            duration_secs: 0.0,
            skip_animation: false,
        }
    }

    pub fn with_cause(mut self, cause: DoorActionCause) -> Self {
        self.cause = cause;
        self
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn skipping_animation(mut self, skip: bool) -> Self {
        self.skip_animation = skip;
        self
    }
}

/// What a mover reports when it reaches a terminal state.
#[derive(Clone, PartialEq, Debug)]
pub struct MoverReport {
    /// Door record after the movement: new cuboid and open state.  Unchanged
    /// if the mover was aborted before it lifted any block.
    pub door:          Door,
    pub cause:         DoorActionCause,
    /// Resolved action (never `Toggle`).
    pub action:        DoorActionType,
    pub actor:         Actor,
    pub duration_secs: f64,
    pub skipped:       bool,
    pub aborted:       Option<AbortReason>,
}

/// Receives exactly one report per mover.
pub trait CompletionSink: Send + Sync {
    /// Called on the mutation context.  `allow_reschedule` is `false` for
    /// aborted movers.
    fn on_mover_finished(&self, mover: &MoverHandle, report: MoverReport, allow_reschedule: bool);
}

// ── Mover ─────────────────────────────────────────────────────────────────────

/// Rendering state of one animated block.
#[derive(Copy, Clone, Debug)]
struct AnimatedBlock {
    entity:   EntityId,
    rendered: Vector3Dd,
    velocity: Vector3Dd,
    replaced: bool,
}

pub struct Mover {
    handle:      MoverHandle,
    request:     ToggleRequest,
    action:      DoorActionType,
    geometry:    Geometry,
    snapshot:    BlockSnapshot,
    destination: Cuboid,
    timing:      AnimationTiming,
    damping:     f64,
    settle:      u64,
    completion:  Arc<dyn CompletionSink>,

    animated:    Vec<AnimatedBlock>,
    step:        u64,
    settle_left: u64,
    /// Original cells have been cleared and the blocks not yet put down.
    lifted:      bool,
    reported:    bool,
}

impl Mover {
    /// Plan the movement for `request`, capture the door's blocks and compute
    /// the timing.  Must run on the mutation context; the world is not
    /// modified until the first [`tick`][Self::tick].
    pub fn new<W: World + ?Sized>(
        request:    ToggleRequest,
        world:      &mut W,
        config:     &EngineConfig,
        completion: Arc<dyn CompletionSink>,
    ) -> MoverResult<Mover> {
        let geometry = plan_geometry(&request.door, request.action)?;
        Self::with_geometry(request, geometry, world, config, completion)
    }

    /// Like [`new`][Self::new] with an already planned geometry.
    pub fn with_geometry<W: World + ?Sized>(
        request:    ToggleRequest,
        geometry:   Geometry,
        world:      &mut W,
        config:     &EngineConfig,
        completion: Arc<dyn CompletionSink>,
    ) -> MoverResult<Mover> {
        let door = &request.door;
        let snapshot = BlockSnapshot::capture(world, door.id, &door.cuboid, &geometry)?;
        let timing = AnimationTiming::compute(
            request.duration_secs,
            snapshot.max_travel_distance(&geometry),
            config,
        );
        let destination = geometry.destination(&door.cuboid);
        let action = request.action.resolve(door.is_open);

        debug!(
            door = %door.id,
            %action,
            blocks = snapshot.len(),
            steps = timing.total_steps,
            skip = request.skip_animation,
            "mover created"
        );

        Ok(Mover {
            handle: MoverHandle::new(door.id),
            action,
            geometry,
            snapshot,
            destination,
            timing,
            damping: config.velocity_damping,
            settle: config.finish_settle_ticks,
            completion,
            animated: Vec::new(),
            step: 0,
            settle_left: 0,
            lifted: false,
            reported: false,
            request,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn handle(&self) -> &MoverHandle {
        &self.handle
    }

    #[inline]
    pub fn door_id(&self) -> DoorId {
        self.handle.door_id()
    }

    #[inline]
    pub fn state(&self) -> MoverState {
        self.handle.state()
    }

    /// `true` once the report has been delivered.  Nothing left to drive.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.reported
    }

    pub fn request(&self) -> &ToggleRequest {
        &self.request
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn snapshot(&self) -> &BlockSnapshot {
        &self.snapshot
    }

    pub fn timing(&self) -> AnimationTiming {
        self.timing
    }

    /// Cuboid the door occupies once the movement completes.
    pub fn destination(&self) -> Cuboid {
        self.destination
    }

    /// Interpolation steps taken so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Advance one step.  Mutation context only.
    ///
    /// Returns the state after the step.  Once the mover is terminal and has
    /// reported ([`is_finished`][Self::is_finished]) further calls do nothing.
    pub fn tick<W: World + ?Sized>(&mut self, world: &mut W) -> MoverState {
        if self.reported {
            return self.handle.state();
        }
        match self.handle.state() {
            MoverState::Pending   => self.start(world),
            MoverState::Animating => self.animate(world),
            MoverState::Finishing => self.settle_step(world),
            MoverState::Done | MoverState::Aborted => {}
        }
        // An abort may land between our own transitions.
        if self.handle.state() == MoverState::Aborted && !self.reported {
            self.clean_up_aborted(world);
        }
        self.handle.state()
    }

    fn start<W: World + ?Sized>(&mut self, world: &mut W) {
        let next = if self.request.skip_animation { MoverState::Finishing } else { MoverState::Animating };
        if !self.handle.transition(MoverState::Pending, next) {
            return;
        }

        for block in self.snapshot.blocks() {
            world.clear_block(block.origin.position);
        }
        self.lifted = true;

        if self.request.skip_animation {
            self.place(world);
            return;
        }

        self.animated = self
            .snapshot
            .blocks()
            .iter()
            .map(|b| {
                let rendered = b.origin.position.to_f64();
                AnimatedBlock {
                    entity: world.spawn_transient_block_entity(&b.block, rendered),
                    rendered,
                    velocity: Vector3Dd::ZERO,
                    replaced: false,
                }
            })
            .collect();
        debug!(door = %self.door_id(), "animation started");
    }

    fn animate<W: World + ?Sized>(&mut self, world: &mut W) {
        self.step += 1;
        let targets = self.targets(self.timing.progress(self.step));
        let replace = self.geometry.turns_blocks() && self.step == self.timing.replace_step();
        let in_place = world.supports_orientation_update();

        for ((block, anim), target) in self.snapshot.blocks().iter().zip(&mut self.animated).zip(targets) {
            anim.velocity = (target - anim.rendered) * self.damping;
            anim.rendered = anim.rendered + anim.velocity;
            if replace && !anim.replaced && block.rotation_class != RotationClass::None {
                replace_entity(world, block, anim, in_place);
            }
            world.set_velocity(anim.entity, anim.velocity);
        }

        if self.step >= self.timing.total_steps
            && self.handle.transition(MoverState::Animating, MoverState::Finishing)
        {
            for anim in &mut self.animated {
                anim.velocity = Vector3Dd::ZERO;
                world.set_velocity(anim.entity, Vector3Dd::ZERO);
            }
            self.settle_left = self.settle;
            if self.settle_left == 0 {
                self.place(world);
            }
        }
    }

    fn settle_step<W: World + ?Sized>(&mut self, world: &mut W) {
        self.settle_left = self.settle_left.saturating_sub(1);
        if self.settle_left == 0 {
            self.place(world);
        }
    }

    /// Final placement, then `Finishing -> Done`.
    fn place<W: World + ?Sized>(&mut self, world: &mut W) {
        self.put_down(world);
        if self.handle.transition(MoverState::Finishing, MoverState::Done) {
            debug!(door = %self.door_id(), steps = self.step, "mover done");
            self.report(None, true, true);
        } else {
            // Aborted while placing; the blocks are down regardless.
            let reason = self.handle.abort_reason().unwrap_or_default();
            self.report(Some(reason), false, true);
        }
    }

    fn clean_up_aborted<W: World + ?Sized>(&mut self, world: &mut W) {
        let moved = self.lifted;
        if moved {
            self.put_down(world);
        }
        let reason = self.handle.abort_reason().unwrap_or_default();
        debug!(door = %self.door_id(), ?reason, moved, "mover aborted");
        self.report(Some(reason), false, moved);
    }

    /// Remove all entities and write every block to its final cell.
    fn put_down<W: World + ?Sized>(&mut self, world: &mut W) {
        for anim in self.animated.drain(..) {
            world.remove(anim.entity);
        }
        for block in self.snapshot.blocks() {
            world.write_block(self.geometry.final_position(&block.origin), &block.final_block);
        }
        self.lifted = false;
    }

    fn report(&mut self, aborted: Option<AbortReason>, allow_reschedule: bool, moved: bool) {
        let mut door = self.request.door.clone();
        if moved {
            door.is_open = is_open_after(door.archetype(), door.is_open, self.action);
            door.cuboid = self.destination;
        }
        let report = MoverReport {
            door,
            cause: self.request.cause,
            action: self.action,
            actor: self.request.actor.clone(),
            duration_secs: self.request.duration_secs,
            skipped: self.request.skip_animation,
            aborted,
        };
        self.reported = true;
        self.completion.on_mover_finished(&self.handle, report, allow_reschedule);
    }

    #[cfg(feature = "parallel")]
    fn targets(&self, progress: f64) -> Vec<Vector3Dd> {
        use rayon::prelude::*;
        let geometry = &self.geometry;
        self.snapshot.blocks().par_iter().map(|b| geometry.pose_at(&b.origin, progress)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn targets(&self, progress: f64) -> Vec<Vector3Dd> {
        self.snapshot.blocks().iter().map(|b| self.geometry.pose_at(&b.origin, progress)).collect()
    }
}

/// Show the turned block state.  Entities that cannot be turned in place are
/// respawned at their rendered position, keeping their velocity.
fn replace_entity<S: EntityAnimationSink + ?Sized>(
    world:    &mut S,
    block:    &SnapshotBlock,
    anim:     &mut AnimatedBlock,
    in_place: bool,
) {
    if in_place {
        world.set_orientation(anim.entity, block.final_block.orientation);
    } else {
        world.remove(anim.entity);
        anim.entity = world.spawn_transient_block_entity(&block.final_block, anim.rendered);
    }
    anim.replaced = true;
}

impl fmt::Debug for Mover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mover")
            .field("door", &self.door_id())
            .field("state", &self.state())
            .field("step", &self.step)
            .field("total_steps", &self.timing.total_steps)
            .field("blocks", &self.snapshot.len())
            .finish()
    }
}
