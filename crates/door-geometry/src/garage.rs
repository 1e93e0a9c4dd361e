//! Motion along an L-shaped rail (garage doors).
//!
//! The rail runs up the wall the door hangs in and then, at `rail_y`, bends
//! horizontally towards the open direction.  A block's position is reduced to
//! one rail coordinate `s`:
//!
//! ```text
//! s <= 0 : vertical leg,   y = rail_y + s, in the wall plane
//! s >  0 : horizontal leg, y = rail_y,     s blocks out from the wall
//! ```
//!
//! Opening adds the door height to every block's `s`, closing subtracts it,
//! so each block switches legs exactly once.

use door_core::{Axis, BlockData, Direction, Vector3Dd, Vector3Di};

use crate::{BlockOrigin, Trajectory};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GarageGeometry {
    /// Direction the horizontal leg extends in.
    pub direction: Direction,
    /// Coordinate of the wall plane along `direction`'s axis.
    pub wall:      i32,
    /// Height of the horizontal leg.
    pub rail_y:    i32,
    /// Rail distance every block travels; positive when opening.
    pub shift:     i32,
}

impl GarageGeometry {
    pub fn new(direction: Direction, wall: i32, rail_y: i32, shift: i32) -> Self {
        Self { direction, wall, rail_y, shift }
    }

    #[inline]
    fn axis(&self) -> Axis {
        self.direction.axis()
    }

    #[inline]
    fn sign(&self) -> i32 {
        self.direction.offset().along(self.axis())
    }

    fn rail_coordinate(&self, p: Vector3Di) -> i32 {
        if p.y < self.rail_y {
            p.y - self.rail_y
        } else {
            (p.along(self.axis()) - self.wall) * self.sign()
        }
    }

    /// Position on the rail at coordinate `s`, keeping `start`'s coordinate
    /// across the door's width.
    fn place(&self, s: f64, start: Vector3Dd) -> Vector3Dd {
        let (along, y) = if s <= 0.0 {
            (self.wall as f64, self.rail_y as f64 + s)
        } else {
            (self.wall as f64 + s * self.sign() as f64, self.rail_y as f64)
        };
        match self.axis() {
            Axis::X => Vector3Dd::new(along, y, start.z),
            _       => Vector3Dd::new(start.x, y, along),
        }
    }

    /// Quarter turn a block makes when it moves from one leg to the other.
    fn block_turn(&self) -> (Axis, i32) {
        // Tipping the top of the wall towards `direction`.
        let (axis, sign) = match self.direction {
            Direction::North => (Axis::X, -1),
            Direction::South => (Axis::X, 1),
            Direction::East  => (Axis::Z, -1),
            _                => (Axis::Z, 1),
        };
        (axis, if self.shift >= 0 { sign } else { -sign })
    }
}

impl Trajectory for GarageGeometry {
    fn origin(&self, position: Vector3Di) -> BlockOrigin {
        BlockOrigin { position, radius: 0.0, phase: self.rail_coordinate(position) as f64 }
    }

    fn pose_at(&self, origin: &BlockOrigin, progress: f64) -> Vector3Dd {
        let s = origin.phase + self.shift as f64 * progress;
        self.place(s, origin.position.to_f64())
    }

    fn final_position(&self, origin: &BlockOrigin) -> Vector3Di {
        let s = origin.phase + self.shift as f64;
        self.place(s, origin.position.to_f64()).round()
    }

    fn final_block(&self, block: &BlockData) -> BlockData {
        let (axis, quarters) = self.block_turn();
        block.rotated(axis, quarters)
    }

    fn travel_distance(&self, _origin: &BlockOrigin) -> f64 {
        self.shift.abs() as f64
    }
}
