//! Toggle actions, causes, turn directions and the responsible actor.

use std::fmt;

use crate::{Axis, Direction};

// ── DoorActionType ────────────────────────────────────────────────────────────

/// What a toggle request asks the door to do.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DoorActionType {
    Open,
    Close,
    /// Open if closed, close if open.
    Toggle,
}

impl DoorActionType {
    /// Resolve `Toggle` against the door's current state.
    pub fn resolve(self, is_open: bool) -> DoorActionType {
        match self {
            DoorActionType::Toggle if is_open => DoorActionType::Close,
            DoorActionType::Toggle => DoorActionType::Open,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DoorActionType::Open   => "open",
            DoorActionType::Close  => "close",
            DoorActionType::Toggle => "toggle",
        }
    }
}

impl fmt::Display for DoorActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DoorActionCause ───────────────────────────────────────────────────────────

/// Why a toggle was requested.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DoorActionCause {
    #[default]
    Player,
    Redstone,
    AutoClose,
    Server,
}

// ── ToggleAction ──────────────────────────────────────────────────────────────

/// Action selection helpers for non-interactive triggers.
pub struct ToggleAction;

impl ToggleAction {
    /// Action to take when the redstone current feeding a door changes.
    ///
    /// A powered door that is closed opens; an unpowered door that is open
    /// closes.  Anything else is a no-op.
    pub fn for_redstone(is_open: bool, new_current: u32) -> Option<DoorActionType> {
        match (new_current > 0, is_open) {
            (false, true) => Some(DoorActionType::Close),
            (true, false) => Some(DoorActionType::Open),
            _             => None,
        }
    }
}

// ── RotateDirection ───────────────────────────────────────────────────────────

/// The direction a door moves or turns when it opens.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotateDirection {
    #[default]
    None,
    /// Clockwise when viewed from above.
    Clockwise,
    /// Counter-clockwise when viewed from above.
    CounterClockwise,
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl RotateDirection {
    /// The direction that undoes this one.
    pub fn opposite(self) -> RotateDirection {
        match self {
            RotateDirection::None             => RotateDirection::None,
            RotateDirection::Clockwise        => RotateDirection::CounterClockwise,
            RotateDirection::CounterClockwise => RotateDirection::Clockwise,
            RotateDirection::North            => RotateDirection::South,
            RotateDirection::East             => RotateDirection::West,
            RotateDirection::South            => RotateDirection::North,
            RotateDirection::West             => RotateDirection::East,
            RotateDirection::Up               => RotateDirection::Down,
            RotateDirection::Down             => RotateDirection::Up,
        }
    }

    /// Lattice direction for the cardinal variants.
    pub fn direction(self) -> Option<Direction> {
        match self {
            RotateDirection::North => Some(Direction::North),
            RotateDirection::East  => Some(Direction::East),
            RotateDirection::South => Some(Direction::South),
            RotateDirection::West  => Some(Direction::West),
            RotateDirection::Up    => Some(Direction::Up),
            RotateDirection::Down  => Some(Direction::Down),
            _ => None,
        }
    }

    /// Sign of a turn about the vertical axis (right-hand rule), if this is a
    /// vertical-axis direction.  Clockwise from above is a negative turn.
    pub fn vertical_turn_sign(self) -> Option<i32> {
        match self {
            RotateDirection::Clockwise        => Some(-1),
            RotateDirection::CounterClockwise => Some(1),
            _ => None,
        }
    }

    /// Horizontal axis and turn sign that tips the top of a standing
    /// structure towards this cardinal direction.
    pub fn tipping_turn(self) -> Option<(Axis, i32)> {
        match self {
            RotateDirection::North => Some((Axis::X, -1)),
            RotateDirection::South => Some((Axis::X, 1)),
            RotateDirection::East  => Some((Axis::Z, -1)),
            RotateDirection::West  => Some((Axis::Z, 1)),
            _ => None,
        }
    }
}

impl fmt::Display for RotateDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

/// Who is responsible for a toggle.  Opaque to the engine; passed through to
/// events and auto-close scheduling.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Actor {
    #[default]
    Server,
    Player { uuid: String, name: String },
}

impl Actor {
    pub fn player(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Actor::Player { uuid: uuid.into(), name: name.into() }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Server               => f.write_str("server"),
            Actor::Player { name, .. }  => f.write_str(name),
        }
    }
}
