//! Handing work to the host's mutation context.
//!
//! The host has exactly one thread allowed to touch world state.  Everything
//! else reaches it through a [`WorldMutationScheduler`], which queues work to
//! run on a later host tick.  Nothing here blocks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use door_core::Tick;

use crate::{ActivityError, ActivityResult, TaskQueue};

/// Deferred work for the mutation context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// The only sanctioned way to reach the mutation context from elsewhere.
pub trait WorldMutationScheduler: Send + Sync {
    /// `true` if the calling thread is the mutation context.
    fn is_mutation_context(&self) -> bool;

    /// Run `task` on the mutation context: immediately when already there,
    /// otherwise at the next tick.
    fn run_on_mutation_context(&self, task: Task);

    /// Run `task` on the mutation context `delay_ticks` ticks from now.
    fn run_on_mutation_context_later(&self, task: Task, delay_ticks: u64);
}

/// A [`WorldMutationScheduler`] driven by the host calling
/// [`advance`][Self::advance] once per tick.
///
/// The thread that creates the scheduler is the mutation context.
pub struct TickScheduler {
    owner: ThreadId,
    now:   AtomicU64,
    queue: Mutex<TaskQueue<Task>>,
}

impl TickScheduler {
    /// Create a scheduler owned by the calling thread.
    pub fn new() -> Self {
        Self::starting_at(Tick::ZERO)
    }

    pub fn starting_at(now: Tick) -> Self {
        Self {
            owner: thread::current().id(),
            now:   AtomicU64::new(now.0),
            queue: Mutex::new(TaskQueue::new()),
        }
    }

    /// Current host tick.
    #[inline]
    pub fn now(&self) -> Tick {
        Tick(self.now.load(Ordering::Acquire))
    }

    /// Tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Earliest tick with a queued task.
    pub fn next_due(&self) -> Option<Tick> {
        self.queue.lock().next_tick()
    }

    /// Step to the next tick and run every task now due.  Returns how many
    /// ran.
    ///
    /// Tasks run outside the queue lock, so they may schedule more work;
    /// anything they queue for the current tick runs on the next `advance`.
    pub fn advance(&self) -> ActivityResult<usize> {
        if !self.is_mutation_context() {
            return Err(ActivityError::WrongExecutionContext { operation: "TickScheduler::advance" });
        }
        let now = Tick(self.now.fetch_add(1, Ordering::AcqRel) + 1);
        let due = self.queue.lock().drain_due(now);
        let count = due.len();
        for task in due {
            task();
        }
        Ok(count)
    }

    fn schedule(&self, task: Task, delay_ticks: u64) {
        let at = self.now().offset(delay_ticks);
        self.queue.lock().push(at, task);
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldMutationScheduler for TickScheduler {
    fn is_mutation_context(&self) -> bool {
        thread::current().id() == self.owner
    }

    fn run_on_mutation_context(&self, task: Task) {
        if self.is_mutation_context() {
            task();
        } else {
            self.schedule(task, 0);
        }
    }

    fn run_on_mutation_context_later(&self, task: Task, delay_ticks: u64) {
        self.schedule(task, delay_ticks);
    }
}
