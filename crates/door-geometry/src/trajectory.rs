//! The `Trajectory` trait and the `Geometry` tagged enum.

use door_core::{BlockData, Cuboid, Vector3Dd, Vector3Di};

use crate::{CylindricalGeometry, FlagGeometry, GarageGeometry, HorizontalAxisGeometry, LinearGeometry};

/// Per-block trajectory parameters fixed when the block is captured.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BlockOrigin {
    /// Cell the block occupied when the animation started.
    pub position: Vector3Di,
    /// Distance from the turning axis.  Zero for non-rotational motion.
    pub radius:   f64,
    /// Engine-specific starting phase: the initial angle for cylindrical
    /// motion, the rail coordinate for garage motion, the distance from the
    /// pole for flags.
    pub phase:    f64,
}

impl BlockOrigin {
    pub fn stationary(position: Vector3Di) -> Self {
        Self { position, radius: 0.0, phase: 0.0 }
    }
}

/// A pure description of how every block of a door moves during one
/// animation.  `progress` runs from 0 (start) to 1 (end).
pub trait Trajectory {
    /// Capture the per-block parameters for a block at `position`.
    fn origin(&self, position: Vector3Di) -> BlockOrigin;

    /// Continuous position of the block at `progress`.
    fn pose_at(&self, origin: &BlockOrigin, progress: f64) -> Vector3Dd;

    /// Lattice cell the block ends up in.  Exact, never accumulated.
    fn final_position(&self, origin: &BlockOrigin) -> Vector3Di;

    /// Block state after the movement (facing and axis turned along).
    fn final_block(&self, block: &BlockData) -> BlockData;

    /// Length of the path the block travels, in blocks.
    fn travel_distance(&self, origin: &BlockOrigin) -> f64;

    /// Cuboid the door occupies once the movement is complete.
    fn destination(&self, cuboid: &Cuboid) -> Cuboid {
        Cuboid::bounding(cuboid.cells().map(|p| self.final_position(&self.origin(p))))
            .unwrap_or(*cuboid)
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// The geometry engine of one animation, selected by archetype.
#[derive(Clone, PartialEq, Debug)]
pub enum Geometry {
    Cylindrical(CylindricalGeometry),
    HorizontalAxis(HorizontalAxisGeometry),
    Linear(LinearGeometry),
    Garage(GarageGeometry),
    Flag(FlagGeometry),
}

macro_rules! dispatch {
    ($self:ident, $g:ident => $e:expr) => {
        match $self {
            Geometry::Cylindrical($g)    => $e,
            Geometry::HorizontalAxis($g) => $e,
            Geometry::Linear($g)         => $e,
            Geometry::Garage($g)         => $e,
            Geometry::Flag($g)           => $e,
        }
    };
}

impl Geometry {
    /// `true` if blocks change orientation, so their visual representation
    /// must be swapped mid-animation.
    pub fn turns_blocks(&self) -> bool {
        match self {
            Geometry::Cylindrical(g)    => g.quarters.rem_euclid(4) != 0,
            Geometry::HorizontalAxis(g) => g.quarters.rem_euclid(4) != 0,
            Geometry::Garage(_)         => true,
            Geometry::Linear(_) | Geometry::Flag(_) => false,
        }
    }
}

impl Trajectory for Geometry {
    fn origin(&self, position: Vector3Di) -> BlockOrigin {
        dispatch!(self, g => g.origin(position))
    }

    fn pose_at(&self, origin: &BlockOrigin, progress: f64) -> Vector3Dd {
        dispatch!(self, g => g.pose_at(origin, progress))
    }

    fn final_position(&self, origin: &BlockOrigin) -> Vector3Di {
        dispatch!(self, g => g.final_position(origin))
    }

    fn final_block(&self, block: &BlockData) -> BlockData {
        dispatch!(self, g => g.final_block(block))
    }

    fn travel_distance(&self, origin: &BlockOrigin) -> f64 {
        dispatch!(self, g => g.travel_distance(origin))
    }

    fn destination(&self, cuboid: &Cuboid) -> Cuboid {
        dispatch!(self, g => g.destination(cuboid))
    }
}
