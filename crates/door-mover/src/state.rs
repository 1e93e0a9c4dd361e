//! Mover lifecycle state and the shared handle other threads hold.
//!
//! ```text
//! Pending ──► Animating ──► Finishing ──► Done
//!    │            │             │
//!    └────────────┴─────────────┴──► Aborted
//! ```
//!
//! All transitions are compare-and-swap on one atomic, so an `abort()` from a
//! worker thread and the mutation thread's own progress can never both win.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use door_core::DoorId;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum MoverState {
    Pending   = 0,
    Animating = 1,
    Finishing = 2,
    Done      = 3,
    Aborted   = 4,
}

impl MoverState {
    fn from_u8(v: u8) -> MoverState {
        match v {
            0 => MoverState::Pending,
            1 => MoverState::Animating,
            2 => MoverState::Finishing,
            3 => MoverState::Done,
            _ => MoverState::Aborted,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, MoverState::Done | MoverState::Aborted)
    }
}

impl fmt::Display for MoverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Why a mover was aborted.  Only affects the event emitted afterwards.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum AbortReason {
    #[default]
    Abort    = 1,
    /// The engine is restarting; the door comes back in a fresh state.
    Restart  = 2,
    /// The engine is going away for good.
    Shutdown = 3,
}

impl AbortReason {
    fn from_u8(v: u8) -> Option<AbortReason> {
        match v {
            1 => Some(AbortReason::Abort),
            2 => Some(AbortReason::Restart),
            3 => Some(AbortReason::Shutdown),
            _ => None,
        }
    }
}

struct Shared {
    door:   DoorId,
    state:  AtomicU8,
    reason: AtomicU8,
}

/// Cheap, cloneable, thread-safe reference to one mover.
///
/// Stored in the busy table.  Identity is by allocation: two handles are the
/// same mover iff [`same_mover`][Self::same_mover] says so.
#[derive(Clone)]
pub struct MoverHandle(Arc<Shared>);

impl MoverHandle {
    pub(crate) fn new(door: DoorId) -> Self {
        MoverHandle(Arc::new(Shared {
            door,
            state:  AtomicU8::new(MoverState::Pending as u8),
            reason: AtomicU8::new(0),
        }))
    }

    #[inline]
    pub fn door_id(&self) -> DoorId {
        self.0.door
    }

    #[inline]
    pub fn state(&self) -> MoverState {
        MoverState::from_u8(self.0.state.load(Ordering::Acquire))
    }

    /// Set when the mover was aborted.
    pub fn abort_reason(&self) -> Option<AbortReason> {
        AbortReason::from_u8(self.0.reason.load(Ordering::Acquire))
    }

    pub fn same_mover(&self, other: &MoverHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Request an abort.  Callable from any thread; only flips the state.
    /// Cleanup runs on the mutation context at the mover's next tick.
    ///
    /// Returns `false` if the mover had already reached a terminal state.
    pub fn abort(&self) -> bool {
        self.abort_with(AbortReason::Abort)
    }

    pub fn restart(&self) -> bool {
        self.abort_with(AbortReason::Restart)
    }

    pub fn shutdown(&self) -> bool {
        self.abort_with(AbortReason::Shutdown)
    }

    fn abort_with(&self, reason: AbortReason) -> bool {
        let mut current = self.0.state.load(Ordering::Acquire);
        loop {
            if MoverState::from_u8(current).is_terminal() {
                return false;
            }
            match self.0.state.compare_exchange_weak(
                current,
                MoverState::Aborted as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.0.reason.store(reason as u8, Ordering::Release);
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Move from `from` to `to`; fails if another thread got there first.
    pub(crate) fn transition(&self, from: MoverState, to: MoverState) -> bool {
        self.0
            .state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl fmt::Debug for MoverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoverHandle")
            .field("door", &self.0.door)
            .field("state", &self.state())
            .finish()
    }
}
