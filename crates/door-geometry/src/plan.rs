//! Selecting and parameterising the geometry engine for a toggle.

use door_core::{Archetype, Axis, Door, DoorActionType, DoorKind};

use crate::{
    CylindricalGeometry, FlagGeometry, GarageGeometry, Geometry, GeometryError, GeometryResult,
    HorizontalAxisGeometry, LinearGeometry,
};

/// Build the geometry that moves `door` for `action`.
///
/// `Toggle` is resolved against `door.is_open`.  Opening an open door or
/// closing a closed one is rejected, except for perpetual archetypes which
/// have no end states.
pub fn plan_geometry(door: &Door, action: DoorActionType) -> GeometryResult<Geometry> {
    let archetype = door.archetype();
    let resolved = action.resolve(door.is_open);
    if !archetype.is_perpetual() {
        let possible = match resolved {
            DoorActionType::Close => door.is_closeable(),
            _ => door.is_openable(),
        };
        if !possible {
            return Err(GeometryError::AlreadyInState { door: door.id, action: resolved });
        }
    }

    let direction = door.movement_direction(action);
    let unsupported = || GeometryError::UnsupportedDirection { archetype, direction };

    let geometry = match &door.kind {
        DoorKind::BigDoor { .. } => {
            let sign = direction.vertical_turn_sign().ok_or_else(unsupported)?;
            Geometry::Cylindrical(CylindricalGeometry::new(door.engine, sign))
        }

        DoorKind::Revolving { quarter_circles } => {
            let sign = direction.vertical_turn_sign().ok_or_else(unsupported)?;
            let quarters = non_zero_or(*quarter_circles, archetype.default_turn());
            Geometry::Cylindrical(CylindricalGeometry::new(door.engine, sign * quarters))
        }

        DoorKind::Drawbridge { .. } => {
            let (axis, sign) = direction.tipping_turn().ok_or_else(unsupported)?;
            Geometry::HorizontalAxis(HorizontalAxisGeometry::new(door.engine, axis, sign))
        }

        DoorKind::Clock { quarter_turns } => {
            let sign = direction.vertical_turn_sign().ok_or_else(unsupported)?;
            // Hands turn about the axis through the clock face.
            let dims = door.cuboid.dimensions();
            let axis = if dims.x <= dims.z { Axis::X } else { Axis::Z };
            let quarters = non_zero_or(*quarter_turns, archetype.default_turn());
            Geometry::HorizontalAxis(HorizontalAxisGeometry::new(door.engine, axis, sign * quarters))
        }

        DoorKind::Sliding { blocks_to_move, .. } => {
            let dir = direction.direction().ok_or_else(unsupported)?;
            // Zero means "slide by the door's own size".
            let distance = match *blocks_to_move {
                0 => door.cuboid.dimensions().along(dir.axis()),
                n => i32::try_from(n).map_err(|_| GeometryError::InvalidParameter {
                    archetype,
                    reason: format!("blocks_to_move {n} is out of range"),
                })?,
            };
            Geometry::Linear(LinearGeometry::new(dir.offset() * distance))
        }

        DoorKind::Garage { .. } => {
            // The rail always extends in the configured open direction.
            let dir = door
                .open_direction
                .direction()
                .filter(|d| d.axis().is_horizontal())
                .ok_or_else(unsupported)?;
            let axis = dir.axis();
            let sign = dir.offset().along(axis);
            let (min, max) = (door.cuboid.min(), door.cuboid.max());
            let wall = if sign > 0 { min.along(axis) } else { max.along(axis) };

            // A closed door is one block deep across the rail, an open one
            // one block high; anything else folds several blocks onto one cell.
            let dims = door.cuboid.dimensions();
            let (state, thickness, extent) = if door.is_open {
                ("open", dims.y, "high")
            } else {
                ("closed", dims.along(axis), "deep")
            };
            if thickness != 1 {
                return Err(GeometryError::InvalidParameter {
                    archetype,
                    reason: format!("{state} door must be 1 block {extent} towards {dir}, got {thickness}"),
                });
            }

            let geometry = if door.is_open {
                let length = door.cuboid.dimensions().along(axis);
                GarageGeometry::new(dir, wall, max.y, -length)
            } else {
                let height = door.cuboid.dimensions().y;
                GarageGeometry::new(dir, wall, max.y + 1, height)
            };
            Geometry::Garage(geometry)
        }

        DoorKind::Flag { amplitude, waves } => {
            if !(amplitude.is_finite() && *amplitude >= 0.0) {
                return Err(GeometryError::InvalidParameter {
                    archetype,
                    reason: format!("amplitude must be a non-negative number, got {amplitude}"),
                });
            }
            let dims = door.cuboid.dimensions();
            let length_axis = if dims.x >= dims.z { Axis::X } else { Axis::Z };
            let (min, max) = (door.cuboid.min(), door.cuboid.max());
            let pole = door.engine.along(length_axis);
            let length = (max.along(length_axis) - pole)
                .abs()
                .max((min.along(length_axis) - pole).abs());
            Geometry::Flag(FlagGeometry::new(door.engine, length_axis, length as f64, *amplitude, *waves))
        }
    };

    Ok(geometry)
}

fn non_zero_or(n: u32, default: u32) -> i32 {
    let n = if n == 0 { default } else { n };
    n.min(i32::MAX as u32) as i32
}

/// Door state after a completed toggle: perpetual archetypes never change it.
pub fn is_open_after(archetype: Archetype, was_open: bool, action: DoorActionType) -> bool {
    if archetype.is_perpetual() {
        return was_open;
    }
    action.resolve(was_open) == DoorActionType::Open
}

