//! Block snapshot captured when an animation starts.

use door_core::{BlockData, Cuboid, DoorId, RotationClass};
use door_geometry::{BlockOrigin, Geometry, Trajectory};

use crate::{MoverError, MoverResult, WorldBlockSink};

/// One captured block.
#[derive(Clone, PartialEq, Debug)]
pub struct SnapshotBlock {
    pub origin:         BlockOrigin,
    pub block:          BlockData,
    /// Block state once the door has moved.
    pub final_block:    BlockData,
    pub rotation_class: RotationClass,
}

/// Every non-air block of a door, in cuboid iteration order.  Immutable once
/// captured.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct BlockSnapshot {
    blocks: Vec<SnapshotBlock>,
}

impl BlockSnapshot {
    /// Read every cell of `cuboid` and record the non-air ones.
    ///
    /// Fails if there is nothing to move.
    pub fn capture<W: WorldBlockSink + ?Sized>(
        world:    &mut W,
        door:     DoorId,
        cuboid:   &Cuboid,
        geometry: &Geometry,
    ) -> MoverResult<BlockSnapshot> {
        let mut blocks = Vec::with_capacity(cuboid.volume().min(1 << 16) as usize);
        for position in cuboid.cells() {
            let block = world.read_block(position);
            if block.is_air() {
                continue;
            }
            blocks.push(SnapshotBlock {
                origin:         geometry.origin(position),
                final_block:    geometry.final_block(&block),
                rotation_class: block.rotation_class(),
                block,
            });
        }
        if blocks.is_empty() {
            return Err(MoverError::InvalidGeometryPrecondition {
                door,
                reason: format!("no blocks to move in {cuboid}"),
            });
        }
        Ok(BlockSnapshot { blocks })
    }

    #[inline]
    pub fn blocks(&self) -> &[SnapshotBlock] {
        &self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Distance covered by the furthest-travelling block.
    pub fn max_travel_distance(&self, geometry: &Geometry) -> f64 {
        self.blocks
            .iter()
            .map(|b| geometry.travel_distance(&b.origin))
            .fold(0.0, f64::max)
    }
}
