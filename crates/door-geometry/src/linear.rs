//! Straight-line translation (sliding doors, portcullises).

use door_core::{BlockData, Vector3Dd, Vector3Di};

use crate::{BlockOrigin, Trajectory};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LinearGeometry {
    /// Offset applied to every block.
    pub delta: Vector3Di,
}

impl LinearGeometry {
    pub fn new(delta: Vector3Di) -> Self {
        Self { delta }
    }
}

impl Trajectory for LinearGeometry {
    fn origin(&self, position: Vector3Di) -> BlockOrigin {
        BlockOrigin::stationary(position)
    }

    fn pose_at(&self, origin: &BlockOrigin, progress: f64) -> Vector3Dd {
        origin.position.to_f64() + self.delta.to_f64() * progress
    }

    fn final_position(&self, origin: &BlockOrigin) -> Vector3Di {
        origin.position + self.delta
    }

    fn final_block(&self, block: &BlockData) -> BlockData {
        block.clone()
    }

    fn travel_distance(&self, _origin: &BlockOrigin) -> f64 {
        self.delta.to_f64().length()
    }
}
