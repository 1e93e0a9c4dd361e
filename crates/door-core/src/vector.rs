//! Lattice and continuous 3D vectors plus the axis-aligned `Cuboid`.
//!
//! Block positions are integer lattice coordinates (`Vector3Di`).  Animation
//! poses are continuous (`Vector3Dd`) and only rounded back to the lattice
//! when blocks are placed.
//!
//! # Rotation convention
//!
//! Rotations follow the right-hand rule about the positive axis with Y up,
//! X east and Z south.  A positive quarter turn about Y therefore moves
//! north (−Z) to west (−X): counter-clockwise when viewed from above.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

// ── Axis ──────────────────────────────────────────────────────────────────────

/// One of the three world axes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Axis::Y)
    }
}

// ── Vector3Di ─────────────────────────────────────────────────────────────────

/// An integer lattice position or offset.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3Di {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vector3Di {
    pub const ZERO: Vector3Di = Vector3Di { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_f64(self) -> Vector3Dd {
        Vector3Dd::new(self.x as f64, self.y as f64, self.z as f64)
    }

    /// Component along `axis`.
    #[inline]
    pub fn along(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Rotate this offset by `quarters` right-handed quarter turns about `axis`.
    ///
    /// Exact: no floating point is involved.
    pub fn rotate_quarters(self, axis: Axis, quarters: i32) -> Vector3Di {
        let mut v = self;
        for _ in 0..quarters.rem_euclid(4) {
            v = match axis {
                Axis::Y => Vector3Di::new(v.z, v.y, -v.x),
                Axis::X => Vector3Di::new(v.x, -v.z, v.y),
                Axis::Z => Vector3Di::new(-v.y, v.x, v.z),
            };
        }
        v
    }

    /// Chebyshev (max-component) distance to `other` in the XZ plane.
    #[inline]
    pub fn planar_chebyshev(self, other: Vector3Di) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

impl Add for Vector3Di {
    type Output = Vector3Di;
    #[inline]
    fn add(self, rhs: Vector3Di) -> Vector3Di {
        Vector3Di::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3Di {
    type Output = Vector3Di;
    #[inline]
    fn sub(self, rhs: Vector3Di) -> Vector3Di {
        Vector3Di::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<i32> for Vector3Di {
    type Output = Vector3Di;
    #[inline]
    fn mul(self, rhs: i32) -> Vector3Di {
        Vector3Di::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3Di {
    type Output = Vector3Di;
    #[inline]
    fn neg(self) -> Vector3Di {
        Vector3Di::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector3Di {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ── Vector3Dd ─────────────────────────────────────────────────────────────────

/// A continuous position, offset or velocity.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3Dd {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3Dd {
    pub const ZERO: Vector3Dd = Vector3Dd { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Round every component to the nearest lattice coordinate.
    #[inline]
    pub fn round(self) -> Vector3Di {
        Vector3Di::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.z.round() as i32,
        )
    }

    /// Rotate this offset by `angle` radians (right-hand rule) about `axis`.
    pub fn rotate_about(self, axis: Axis, angle: f64) -> Vector3Dd {
        let (sin, cos) = angle.sin_cos();
        match axis {
            Axis::Y => Vector3Dd::new(
                self.x * cos + self.z * sin,
                self.y,
                -self.x * sin + self.z * cos,
            ),
            Axis::X => Vector3Dd::new(
                self.x,
                self.y * cos - self.z * sin,
                self.y * sin + self.z * cos,
            ),
            Axis::Z => Vector3Dd::new(
                self.x * cos - self.y * sin,
                self.x * sin + self.y * cos,
                self.z,
            ),
        }
    }
}

impl Add for Vector3Dd {
    type Output = Vector3Dd;
    #[inline]
    fn add(self, rhs: Vector3Dd) -> Vector3Dd {
        Vector3Dd::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3Dd {
    type Output = Vector3Dd;
    #[inline]
    fn sub(self, rhs: Vector3Dd) -> Vector3Dd {
        Vector3Dd::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3Dd {
    type Output = Vector3Dd;
    #[inline]
    fn mul(self, rhs: f64) -> Vector3Dd {
        Vector3Dd::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Vector3Dd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// ── Cuboid ────────────────────────────────────────────────────────────────────

/// An inclusive axis-aligned box of lattice cells.
///
/// `min` is component-wise ≤ `max`; the constructor normalizes its corners.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cuboid {
    min: Vector3Di,
    max: Vector3Di,
}

impl Cuboid {
    /// Build a cuboid spanning the two (inclusive) corners in any order.
    pub fn new(a: Vector3Di, b: Vector3Di) -> Self {
        Self {
            min: Vector3Di::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vector3Di::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Smallest cuboid containing every point, or `None` for an empty iterator.
    pub fn bounding<I: IntoIterator<Item = Vector3Di>>(points: I) -> Option<Cuboid> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Cuboid::new(first, first), |c, p| {
            Cuboid::new(
                Vector3Di::new(c.min.x.min(p.x), c.min.y.min(p.y), c.min.z.min(p.z)),
                Vector3Di::new(c.max.x.max(p.x), c.max.y.max(p.y), c.max.z.max(p.z)),
            )
        }))
    }

    #[inline]
    pub fn min(&self) -> Vector3Di {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vector3Di {
        self.max
    }

    /// Edge lengths in cells.
    pub fn dimensions(&self) -> Vector3Di {
        self.max - self.min + Vector3Di::new(1, 1, 1)
    }

    /// Number of cells inside the cuboid.
    pub fn volume(&self) -> u64 {
        let d = self.dimensions();
        d.x as u64 * d.y as u64 * d.z as u64
    }

    pub fn contains(&self, p: Vector3Di) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Every cell, iterated X-major, then Z, then Y (bottom to top).
    pub fn cells(&self) -> impl Iterator<Item = Vector3Di> + '_ {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| {
            (min.z..=max.z).flat_map(move |z| (min.y..=max.y).map(move |y| Vector3Di::new(x, y, z)))
        })
    }
}

impl fmt::Display for Cuboid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}
