//! An in-memory [`World`](crate::World) for tests, demos and headless hosts.

use rustc_hash::FxHashMap;

use door_core::{BlockData, Cuboid, EntityId, Orientation, Vector3Dd, Vector3Di};

use crate::{EntityAnimationSink, WorldBlockSink};

/// A transient block entity.
#[derive(Clone, PartialEq, Debug)]
pub struct MemoryEntity {
    pub block:    BlockData,
    pub position: Vector3Dd,
    pub velocity: Vector3Dd,
}

/// Sparse block storage plus transient entities.  Cells never written are
/// air.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorld {
    blocks:             FxHashMap<Vector3Di, BlockData>,
    entities:           FxHashMap<EntityId, MemoryEntity>,
    next_entity:        u64,
    spawned:            u64,
    orientation_update: bool,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let movers turn entities in place instead of respawning them.
    pub fn with_orientation_updates(mut self, enabled: bool) -> Self {
        self.orientation_update = enabled;
        self
    }

    pub fn set_block(&mut self, position: Vector3Di, block: BlockData) {
        if block.is_air() {
            self.blocks.remove(&position);
        } else {
            self.blocks.insert(position, block);
        }
    }

    /// Fill every cell of `cuboid` with `block`.
    pub fn fill(&mut self, cuboid: &Cuboid, block: &BlockData) {
        for p in cuboid.cells() {
            self.set_block(p, block.clone());
        }
    }

    /// Non-air block at `position`.
    pub fn block(&self, position: Vector3Di) -> Option<&BlockData> {
        self.blocks.get(&position)
    }

    /// Every non-air block, in no particular order.
    pub fn blocks(&self) -> impl Iterator<Item = (Vector3Di, &BlockData)> {
        self.blocks.iter().map(|(p, b)| (*p, b))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn entity(&self, id: EntityId) -> Option<&MemoryEntity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &MemoryEntity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    /// Live transient entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities spawned over the world's lifetime.
    pub fn spawned_count(&self) -> u64 {
        self.spawned
    }

    /// Apply one tick of motion to every entity.
    pub fn step_entities(&mut self) {
        for entity in self.entities.values_mut() {
            entity.position = entity.position + entity.velocity;
        }
    }
}

impl WorldBlockSink for MemoryWorld {
    fn read_block(&mut self, position: Vector3Di) -> BlockData {
        self.blocks.get(&position).cloned().unwrap_or_else(BlockData::air)
    }

    fn write_block(&mut self, position: Vector3Di, block: &BlockData) {
        self.set_block(position, block.clone());
    }

    fn clear_block(&mut self, position: Vector3Di) {
        self.blocks.remove(&position);
    }
}

impl EntityAnimationSink for MemoryWorld {
    fn spawn_transient_block_entity(&mut self, block: &BlockData, position: Vector3Dd) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.spawned += 1;
        self.entities.insert(id, MemoryEntity {
            block: block.clone(),
            position,
            velocity: Vector3Dd::ZERO,
        });
        id
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: Vector3Dd) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.velocity = velocity;
        }
    }

    fn set_orientation(&mut self, entity: EntityId, orientation: Orientation) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.block.orientation = orientation;
        }
    }

    fn remove(&mut self, entity: EntityId) {
        self.entities.remove(&entity);
    }

    fn supports_orientation_update(&self) -> bool {
        self.orientation_update
    }
}
