//! `TaskQueue` — sparse tick-keyed queue of deferred work.
//!
//! Most ticks have nothing due.  Entries are grouped by the tick they fall
//! due at, so draining costs O(log W) per distinct tick where W is the number
//! of distinct ticks enqueued, not O(total entries).

use std::collections::BTreeMap;

use door_core::Tick;

/// A priority queue mapping ticks → items due at that tick.
pub struct TaskQueue<T> {
    inner: BTreeMap<Tick, Vec<T>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `item` for `tick`.  Items due at the same tick keep their
    /// insertion order.
    pub fn push(&mut self, tick: Tick, item: T) {
        self.inner.entry(tick).or_default().push(item);
        self.total += 1;
    }

    /// Remove and return every item due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: Tick) -> Vec<T> {
        let later = match now.0.checked_add(1) {
            Some(next) => self.inner.split_off(&Tick(next)),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.inner, later);
        let items: Vec<T> = due.into_values().flatten().collect();
        self.total -= items.len();
        items
    }

    /// Remove every item for which `pred` returns `true`.  Returns how many
    /// were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.total;
        self.inner.retain(|_, items| {
            items.retain(|item| !pred(item));
            !items.is_empty()
        });
        self.total = self.inner.values().map(Vec::len).sum();
        before - self.total
    }

    /// The earliest tick with at least one queued item, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Total number of (tick, item) entries.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct ticks with at least one queued item.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }
}
