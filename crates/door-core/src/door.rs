//! Door records: an archetype tag plus archetype-specific parameters.
//!
//! A `Door` is plain data.  Behavior is chosen by matching on [`DoorKind`]
//! (geometry in `door-geometry`, capabilities here on [`Archetype`]), never
//! by inspecting types at runtime.

use std::fmt;

use crate::{CoreError, CoreResult, Cuboid, DoorActionType, DoorId, RotateDirection, TypeId, Vector3Di};

// ── Archetype ─────────────────────────────────────────────────────────────────

/// Behavioral category of a door.  Closed set.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Archetype {
    BigDoor,
    Drawbridge,
    Sliding,
    Revolving,
    Garage,
    Flag,
    Clock,
}

impl Archetype {
    pub const ALL: [Archetype; 7] = [
        Archetype::BigDoor,
        Archetype::Drawbridge,
        Archetype::Sliding,
        Archetype::Revolving,
        Archetype::Garage,
        Archetype::Flag,
        Archetype::Clock,
    ];

    /// Display name, also used as the default type name.
    pub fn name(self) -> &'static str {
        match self {
            Archetype::BigDoor    => "BigDoor",
            Archetype::Drawbridge => "Drawbridge",
            Archetype::Sliding    => "SlidingDoor",
            Archetype::Revolving  => "RevolvingDoor",
            Archetype::Garage     => "GarageDoor",
            Archetype::Flag       => "Flag",
            Archetype::Clock      => "Clock",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Archetype> {
        Archetype::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }

    /// Doors of this archetype can be closed again automatically after opening.
    pub fn is_timer_toggleable(self) -> bool {
        matches!(
            self,
            Archetype::BigDoor | Archetype::Drawbridge | Archetype::Sliding | Archetype::Garage
        )
    }

    /// The door has no distinct open/closed end states (it just keeps moving).
    pub fn is_perpetual(self) -> bool {
        matches!(self, Archetype::Flag | Archetype::Clock | Archetype::Revolving)
    }

    /// Quarter turns one toggle makes when the door sets no count of its own.
    /// Zero for archetypes that translate rather than turn.
    pub fn default_turn(self) -> u32 {
        match self {
            Archetype::BigDoor | Archetype::Drawbridge => 1,
            Archetype::Revolving                       => 4,
            Archetype::Clock                           => 2,
            Archetype::Sliding | Archetype::Garage | Archetype::Flag => 0,
        }
    }

    /// Open directions a door of this archetype may be configured with.
    pub fn valid_open_directions(self) -> &'static [RotateDirection] {
        use RotateDirection::*;
        match self {
            Archetype::BigDoor | Archetype::Revolving | Archetype::Clock => &[Clockwise, CounterClockwise],
            Archetype::Drawbridge | Archetype::Garage                    => &[North, East, South, West],
            Archetype::Sliding                                           => &[North, East, South, West, Up, Down],
            Archetype::Flag                                              => &[None],
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── DoorKind ──────────────────────────────────────────────────────────────────

/// Archetype tag plus the parameters only that archetype uses.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DoorKind {
    BigDoor { auto_close_secs: Option<u32> },
    Drawbridge { auto_close_secs: Option<u32> },
    Sliding { blocks_to_move: u32, auto_close_secs: Option<u32> },
    /// Turns `quarter_circles` quarter turns per toggle.
    Revolving { quarter_circles: u32 },
    Garage { auto_close_secs: Option<u32> },
    /// Waves `waves` times with the given amplitude (in blocks) per toggle.
    Flag { amplitude: f64, waves: u32 },
    /// Hands advance `quarter_turns` quarter turns per toggle.
    Clock { quarter_turns: u32 },
}

impl DoorKind {
    pub fn archetype(&self) -> Archetype {
        match self {
            DoorKind::BigDoor { .. }    => Archetype::BigDoor,
            DoorKind::Drawbridge { .. } => Archetype::Drawbridge,
            DoorKind::Sliding { .. }    => Archetype::Sliding,
            DoorKind::Revolving { .. }  => Archetype::Revolving,
            DoorKind::Garage { .. }     => Archetype::Garage,
            DoorKind::Flag { .. }       => Archetype::Flag,
            DoorKind::Clock { .. }      => Archetype::Clock,
        }
    }

    /// Auto-close delay, for the archetypes that support one.
    pub fn auto_close_secs(&self) -> Option<u32> {
        match self {
            DoorKind::BigDoor { auto_close_secs }
            | DoorKind::Drawbridge { auto_close_secs }
            | DoorKind::Sliding { auto_close_secs, .. }
            | DoorKind::Garage { auto_close_secs } => *auto_close_secs,
            _ => None,
        }
    }
}

// ── Door ──────────────────────────────────────────────────────────────────────

/// A door record as handed to the engine by the persistence layer.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Door {
    pub id: DoorId,
    pub name: String,
    /// Registered type this door belongs to.
    pub type_id: TypeId,
    pub kind: DoorKind,
    /// Cells currently occupied by the door.
    pub cuboid: Cuboid,
    /// Turning point for rotational archetypes.
    pub engine: Vector3Di,
    /// Direction of the opening movement.
    pub open_direction: RotateDirection,
    pub is_open: bool,
}

impl Door {
    /// Build a door record, validating the open direction for the archetype.
    pub fn new(
        id:             DoorId,
        name:           impl Into<String>,
        type_id:        TypeId,
        kind:           DoorKind,
        cuboid:         Cuboid,
        engine:         Vector3Di,
        open_direction: RotateDirection,
    ) -> CoreResult<Door> {
        let archetype = kind.archetype();
        if !archetype.valid_open_directions().contains(&open_direction) {
            return Err(CoreError::InvalidDirection {
                direction: open_direction,
                archetype: archetype.name(),
            });
        }
        Ok(Door {
            id,
            name: name.into(),
            type_id,
            kind,
            cuboid,
            engine,
            open_direction,
            is_open: false,
        })
    }

    #[inline]
    pub fn archetype(&self) -> Archetype {
        self.kind.archetype()
    }

    /// Direction of movement for `action`.  Closing reverses the opening
    /// direction, except for perpetual archetypes which always keep going.
    pub fn movement_direction(&self, action: DoorActionType) -> RotateDirection {
        match action.resolve(self.is_open) {
            DoorActionType::Close if !self.archetype().is_perpetual() => self.open_direction.opposite(),
            _ => self.open_direction,
        }
    }

    #[inline]
    pub fn is_openable(&self) -> bool {
        !self.is_open
    }

    #[inline]
    pub fn is_closeable(&self) -> bool {
        self.is_open
    }
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\" ({}) {}", self.id, self.name, self.archetype(), self.cuboid)
    }
}
