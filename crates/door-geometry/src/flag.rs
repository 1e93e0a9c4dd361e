//! Waving motion (flags).
//!
//! The flag hangs in a vertical plane that extends from its pole along
//! `length_axis`.  Blocks swing sideways, perpendicular to that plane, in a
//! travelling sine wave whose amplitude grows with the distance from the pole
//! and fades in and out over the animation:
//!
//! ```text
//! side(p) = A · (d / L) · sin(π·p) · sin(2π·waves·p − d / 2)
//! ```
//!
//! At `p = 0` and `p = 1` every block is back in its own cell, so a flag
//! never changes its footprint.

use std::f64::consts::{PI, TAU};

use door_core::{Axis, BlockData, Cuboid, Vector3Dd, Vector3Di};

use crate::{BlockOrigin, Trajectory};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FlagGeometry {
    pub pole:        Vector3Di,
    /// Horizontal axis the flag extends along from its pole.
    pub length_axis: Axis,
    /// Distance from the pole to the free end, in blocks (at least 1).
    pub length:      f64,
    /// Maximum sideways displacement of the free end, in blocks.
    pub amplitude:   f64,
    pub waves:       u32,
}

impl FlagGeometry {
    pub fn new(pole: Vector3Di, length_axis: Axis, length: f64, amplitude: f64, waves: u32) -> Self {
        Self { pole, length_axis, length: length.max(1.0), amplitude, waves }
    }

    fn side_offset(&self, distance: f64, progress: f64) -> f64 {
        let envelope = (PI * progress).sin();
        let wave = (TAU * self.waves as f64 * progress - distance * 0.5).sin();
        self.amplitude * (distance / self.length) * envelope * wave
    }
}

impl Trajectory for FlagGeometry {
    fn origin(&self, position: Vector3Di) -> BlockOrigin {
        let distance = (position.along(self.length_axis) - self.pole.along(self.length_axis)).abs() as f64;
        BlockOrigin { position, radius: 0.0, phase: distance }
    }

    fn pose_at(&self, origin: &BlockOrigin, progress: f64) -> Vector3Dd {
        let start = origin.position.to_f64();
        let side = self.side_offset(origin.phase, progress.clamp(0.0, 1.0));
        match self.length_axis {
            Axis::X => Vector3Dd::new(start.x, start.y, start.z + side),
            _       => Vector3Dd::new(start.x + side, start.y, start.z),
        }
    }

    fn final_position(&self, origin: &BlockOrigin) -> Vector3Di {
        origin.position
    }

    fn final_block(&self, block: &BlockData) -> BlockData {
        block.clone()
    }

    fn travel_distance(&self, origin: &BlockOrigin) -> f64 {
        // Out and back twice per wave at the local amplitude.
        4.0 * self.amplitude * (origin.phase / self.length) * self.waves.max(1) as f64
    }

    fn destination(&self, cuboid: &Cuboid) -> Cuboid {
        *cuboid
    }
}
