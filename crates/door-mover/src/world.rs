//! Host world collaborators.
//!
//! The engine never owns the world.  Every call here happens on the host's
//! mutation context, with the world passed in as `&mut W` for the duration
//! of one tick.

use door_core::{BlockData, EntityId, Orientation, Vector3Dd, Vector3Di};

/// Block reads and writes.
pub trait WorldBlockSink {
    fn read_block(&mut self, position: Vector3Di) -> BlockData;

    fn write_block(&mut self, position: Vector3Di, block: &BlockData);

    /// Replace the block at `position` with air.
    fn clear_block(&mut self, position: Vector3Di);
}

/// Transient entities that render blocks while they move.
pub trait EntityAnimationSink {
    fn spawn_transient_block_entity(&mut self, block: &BlockData, position: Vector3Dd) -> EntityId;

    /// Velocity in blocks per tick; the host moves the entity by it each tick.
    fn set_velocity(&mut self, entity: EntityId, velocity: Vector3Dd);

    fn set_orientation(&mut self, entity: EntityId, orientation: Orientation);

    fn remove(&mut self, entity: EntityId);

    /// `true` if [`set_orientation`][Self::set_orientation] updates a spawned
    /// entity in place.  Otherwise entities are respawned to turn them.
    fn supports_orientation_update(&self) -> bool {
        false
    }
}

/// Everything a mover needs from the host.
pub trait World: WorldBlockSink + EntityAnimationSink {}

impl<T: WorldBlockSink + EntityAnimationSink> World for T {}
