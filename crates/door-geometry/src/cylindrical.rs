//! Rotation about a vertical axis (big doors, revolving doors).
//!
//! Every block follows a circular arc in its own horizontal plane.  A block's
//! planar offset from the axis is written as `(r·sin a, r·cos a)` in `(x, z)`,
//! so a turn by `θ` (right-hand rule about +Y) simply advances `a` to `a + θ`:
//!
//! ```text
//! pose(p) = axis + (r·sin(a + θ·p), y, r·cos(a + θ·p))
//! ```
//!
//! Blocks on the axis (`r == 0`) stay put and are only re-oriented.

use std::f64::consts::FRAC_PI_2;

use door_core::{Axis, BlockData, Vector3Dd, Vector3Di};

use crate::{BlockOrigin, Trajectory};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CylindricalGeometry {
    /// Turning point.  Only its X and Z coordinates matter.
    pub axis:     Vector3Di,
    /// Signed number of quarter turns; positive is counter-clockwise seen
    /// from above.
    pub quarters: i32,
}

impl CylindricalGeometry {
    pub fn new(axis: Vector3Di, quarters: i32) -> Self {
        Self { axis, quarters }
    }

    /// Total turn angle in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.quarters as f64 * FRAC_PI_2
    }
}

impl Trajectory for CylindricalGeometry {
    fn origin(&self, position: Vector3Di) -> BlockOrigin {
        let dx = (position.x - self.axis.x) as f64;
        let dz = (position.z - self.axis.z) as f64;
        let radius = dx.hypot(dz);
        if radius == 0.0 {
            return BlockOrigin::stationary(position);
        }
        BlockOrigin { position, radius, phase: dx.atan2(dz) }
    }

    fn pose_at(&self, origin: &BlockOrigin, progress: f64) -> Vector3Dd {
        let start = origin.position.to_f64();
        if origin.radius == 0.0 {
            return start;
        }
        let a = origin.phase + self.angle() * progress;
        Vector3Dd::new(
            self.axis.x as f64 + origin.radius * a.sin(),
            start.y,
            self.axis.z as f64 + origin.radius * a.cos(),
        )
    }

    fn final_position(&self, origin: &BlockOrigin) -> Vector3Di {
        let offset = origin.position - self.axis;
        let turned = Vector3Di::new(offset.x, 0, offset.z).rotate_quarters(Axis::Y, self.quarters);
        Vector3Di::new(self.axis.x + turned.x, origin.position.y, self.axis.z + turned.z)
    }

    fn final_block(&self, block: &BlockData) -> BlockData {
        block.rotated(Axis::Y, self.quarters)
    }

    fn travel_distance(&self, origin: &BlockOrigin) -> f64 {
        origin.radius * self.angle().abs()
    }
}
