//! Rotation about a horizontal axis (drawbridges, clock hands).

use std::f64::consts::FRAC_PI_2;

use door_core::{Axis, BlockData, Vector3Dd, Vector3Di};

use crate::{BlockOrigin, Trajectory};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct HorizontalAxisGeometry {
    /// A point on the rotation axis.
    pub pivot:    Vector3Di,
    /// `Axis::X` or `Axis::Z`.
    pub axis:     Axis,
    /// Signed quarter turns, right-hand rule about the positive axis.
    pub quarters: i32,
}

impl HorizontalAxisGeometry {
    pub fn new(pivot: Vector3Di, axis: Axis, quarters: i32) -> Self {
        Self { pivot, axis, quarters }
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.quarters as f64 * FRAC_PI_2
    }
}

impl Trajectory for HorizontalAxisGeometry {
    fn origin(&self, position: Vector3Di) -> BlockOrigin {
        let offset = position - self.pivot;
        // Distance in the plane perpendicular to the axis.
        let (a, b) = match self.axis {
            Axis::X => (offset.y, offset.z),
            Axis::Z => (offset.x, offset.y),
            Axis::Y => (offset.x, offset.z),
        };
        BlockOrigin { position, radius: (a as f64).hypot(b as f64), phase: 0.0 }
    }

    fn pose_at(&self, origin: &BlockOrigin, progress: f64) -> Vector3Dd {
        if origin.radius == 0.0 {
            return origin.position.to_f64();
        }
        let offset = (origin.position - self.pivot).to_f64();
        self.pivot.to_f64() + offset.rotate_about(self.axis, self.angle() * progress)
    }

    fn final_position(&self, origin: &BlockOrigin) -> Vector3Di {
        self.pivot + (origin.position - self.pivot).rotate_quarters(self.axis, self.quarters)
    }

    fn final_block(&self, block: &BlockData) -> BlockData {
        block.rotated(self.axis, self.quarters)
    }

    fn travel_distance(&self, origin: &BlockOrigin) -> f64 {
        origin.radius * self.angle().abs()
    }
}
