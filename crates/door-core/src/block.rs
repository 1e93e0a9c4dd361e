//! Block state as seen by the engine.
//!
//! The host owns the real block representation.  The engine only needs an
//! opaque material name plus the part of the block state that changes when a
//! block is turned: its axis (logs, pillars) or its facing (stairs, doors).

use std::fmt;

use crate::{Axis, Vector3Di};

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the six block faces.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit lattice offset pointing out of this face.
    pub fn offset(self) -> Vector3Di {
        match self {
            Direction::North => Vector3Di::new(0, 0, -1),
            Direction::East  => Vector3Di::new(1, 0, 0),
            Direction::South => Vector3Di::new(0, 0, 1),
            Direction::West  => Vector3Di::new(-1, 0, 0),
            Direction::Up    => Vector3Di::new(0, 1, 0),
            Direction::Down  => Vector3Di::new(0, -1, 0),
        }
    }

    /// Inverse of [`offset`][Self::offset]; `None` unless `v` is a unit axis vector.
    pub fn from_offset(v: Vector3Di) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.offset() == v)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East  => Direction::West,
            Direction::South => Direction::North,
            Direction::West  => Direction::East,
            Direction::Up    => Direction::Down,
            Direction::Down  => Direction::Up,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::Z,
            Direction::East | Direction::West   => Axis::X,
            Direction::Up | Direction::Down     => Axis::Y,
        }
    }

    /// Rotate by `quarters` right-handed quarter turns about `axis`.
    pub fn rotate_quarters(self, axis: Axis, quarters: i32) -> Direction {
        let rotated = self.offset().rotate_quarters(axis, quarters);
        // A rotated unit axis vector is always a unit axis vector.
        Direction::from_offset(rotated).unwrap_or(self)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "north",
            Direction::East  => "east",
            Direction::South => "south",
            Direction::West  => "west",
            Direction::Up    => "up",
            Direction::Down  => "down",
        };
        f.write_str(s)
    }
}

// ── Orientation ───────────────────────────────────────────────────────────────

/// The rotatable part of a block's state.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Rotation-invariant block (stone, planks, glass...).
    #[default]
    None,
    /// Block aligned along an axis (logs, pillars, chains).
    Axis(Axis),
    /// Block facing one of the six directions (stairs, trapdoors, signs).
    Facing(Direction),
}

impl Orientation {
    /// Rotate by `quarters` right-handed quarter turns about `axis`.
    pub fn rotate_quarters(self, axis: Axis, quarters: i32) -> Orientation {
        match self {
            Orientation::None => Orientation::None,
            Orientation::Axis(a) => {
                let unit = match a {
                    Axis::X => Vector3Di::new(1, 0, 0),
                    Axis::Y => Vector3Di::new(0, 1, 0),
                    Axis::Z => Vector3Di::new(0, 0, 1),
                };
                let r = unit.rotate_quarters(axis, quarters);
                let rotated = if r.x != 0 {
                    Axis::X
                } else if r.y != 0 {
                    Axis::Y
                } else {
                    Axis::Z
                };
                Orientation::Axis(rotated)
            }
            Orientation::Facing(d) => Orientation::Facing(d.rotate_quarters(axis, quarters)),
        }
    }

    pub fn rotation_class(self) -> RotationClass {
        match self {
            Orientation::None      => RotationClass::None,
            Orientation::Axis(_)   => RotationClass::Axial,
            Orientation::Facing(_) => RotationClass::Directional,
        }
    }
}

/// How a block's state must be transformed when the block is turned.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum RotationClass {
    /// Nothing to transform.
    #[default]
    None,
    /// Axis-aligned state: X and Z swap on odd quarter turns about Y.
    Axial,
    /// Facing state: the facing rotates with the block.
    Directional,
}

// ── BlockData ─────────────────────────────────────────────────────────────────

/// Opaque material descriptor captured from, and written back to, the world.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockData {
    /// Host material name, e.g. `"oak_log"`.  Empty means air.
    pub material: String,
    pub orientation: Orientation,
}

impl BlockData {
    pub fn new(material: impl Into<String>, orientation: Orientation) -> Self {
        Self { material: material.into(), orientation }
    }

    /// A rotation-invariant block.
    pub fn simple(material: impl Into<String>) -> Self {
        Self::new(material, Orientation::None)
    }

    pub fn air() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.material.is_empty()
    }

    #[inline]
    pub fn rotation_class(&self) -> RotationClass {
        self.orientation.rotation_class()
    }

    /// Copy of this block turned by `quarters` quarter turns about `axis`.
    pub fn rotated(&self, axis: Axis, quarters: i32) -> BlockData {
        BlockData {
            material:    self.material.clone(),
            orientation: self.orientation.rotate_quarters(axis, quarters),
        }
    }
}

impl fmt::Display for BlockData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.orientation {
            Orientation::None      => write!(f, "{}", self.material),
            Orientation::Axis(a)   => write!(f, "{}[axis={:?}]", self.material, a),
            Orientation::Facing(d) => write!(f, "{}[facing={}]", self.material, d),
        }
    }
}
