//! `TimedCache` — an expiring map with per-key atomic updates.
//!
//! Keys are spread over a fixed number of shards, each a `parking_lot::Mutex`
//! around an `FxHashMap`.  Every operation on a key runs entirely under that
//! key's shard lock, so check-expiry-then-replace is race-free while
//! operations on keys in other shards proceed in parallel.
//!
//! Values are handed out as `Arc<V>`.  Closures passed to the `compute*`
//! family run under the shard lock and must not call back into the same
//! cache.

use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHasher};
use tracing::debug;

use crate::clock::{CacheClock, SystemClock};
use crate::sweeper::Sweeper;
use crate::{CacheError, CacheResult};

const SHARD_COUNT: usize = 16;

// ── Retention ─────────────────────────────────────────────────────────────────

/// How the cache holds on to its values.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Retention {
    /// The cache keeps every value alive until it expires.
    #[default]
    Strong,
    /// Expired values are downgraded to a `Weak` reference instead of being
    /// dropped (when `keep_after_timeout` is set) and stay readable for as
    /// long as some caller still holds them.  With a zero timeout the cache
    /// never holds a strong reference at all.
    Weak,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Policy {
    timeout_ms:         u64,
    refresh:            bool,
    retention:          Retention,
    keep_after_timeout: bool,
}

impl Policy {
    #[inline]
    fn keeps_weak(&self) -> bool {
        self.retention == Retention::Weak && self.keep_after_timeout
    }
}

// ── TimedValue ────────────────────────────────────────────────────────────────

enum Slot<V> {
    Strong(Arc<V>),
    Weak(Weak<V>),
}

struct TimedValue<V> {
    slot:          Slot<V>,
    inserted_at:   u64,
    last_accessed: u64,
}

impl<V> TimedValue<V> {
    fn new(value: Arc<V>, now: u64, policy: &Policy) -> Self {
        let slot = if policy.retention == Retention::Weak && policy.timeout_ms == 0 {
            Slot::Weak(Arc::downgrade(&value))
        } else {
            Slot::Strong(value)
        };
        Self { slot, inserted_at: now, last_accessed: now }
    }

    fn timed_out(&self, now: u64, policy: &Policy) -> bool {
        if policy.timeout_ms == 0 {
            return false;
        }
        let reference = if policy.refresh { self.last_accessed } else { self.inserted_at };
        now.saturating_sub(reference) > policy.timeout_ms
    }

    fn demote(&mut self) {
        let weak = match &self.slot {
            Slot::Strong(v) => Arc::downgrade(v),
            Slot::Weak(_) => return,
        };
        self.slot = Slot::Weak(weak);
    }

    /// The value if the entry is still logically present.
    fn value(&mut self, now: u64, policy: &Policy) -> Option<Arc<V>> {
        if self.timed_out(now, policy) {
            if !policy.keeps_weak() {
                return None;
            }
            self.demote();
        }
        let value = match &self.slot {
            Slot::Strong(v) => Arc::clone(v),
            Slot::Weak(w) => w.upgrade()?,
        };
        if policy.refresh {
            self.last_accessed = now;
            if policy.timeout_ms > 0 {
                self.slot = Slot::Strong(Arc::clone(&value));
            }
        }
        Some(value)
    }

    /// `false` once the entry can be physically removed.
    fn survives_sweep(&mut self, now: u64, policy: &Policy) -> bool {
        if self.timed_out(now, policy) {
            if !policy.keeps_weak() {
                return false;
            }
            self.demote();
        }
        match &self.slot {
            Slot::Strong(_) => true,
            Slot::Weak(w) => w.strong_count() > 0,
        }
    }
}

// ── Inner ─────────────────────────────────────────────────────────────────────

type Shard<K, V> = Mutex<FxHashMap<K, TimedValue<V>>>;

pub(crate) struct Inner<K, V> {
    shards: Box<[Shard<K, V>]>,
    policy: Policy,
    clock:  Arc<dyn CacheClock>,
}

impl<K: Eq + Hash, V> Inner<K, V> {
    fn shard(&self, key: &K) -> &Shard<K, V> {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        &self.shards[hasher.finish() as usize % self.shards.len()]
    }

    /// Live value for `key`, evicting the entry if it is logically absent.
    fn live(&self, map: &mut FxHashMap<K, TimedValue<V>>, key: &K, now: u64) -> Option<Arc<V>> {
        let entry = map.get_mut(key)?;
        match entry.value(now, &self.policy) {
            Some(v) => Some(v),
            None => {
                map.remove(key);
                None
            }
        }
    }

    fn entry(&self, value: Arc<V>, now: u64) -> TimedValue<V> {
        TimedValue::new(value, now, &self.policy)
    }

    /// Remove every entry that can no longer produce a value.  Returns the
    /// number of entries removed.
    pub(crate) fn cleanup(&self) -> usize {
        let now = self.clock.now_millis();
        let mut removed = 0;
        for shard in self.shards.iter() {
            let mut map = shard.lock();
            let before = map.len();
            map.retain(|_, entry| entry.survives_sweep(now, &self.policy));
            removed += before - map.len();
        }
        removed
    }
}

// ── TimedCache ────────────────────────────────────────────────────────────────

/// Expiring key/value store.
///
/// An entry is treated as absent once `now - reference > timeout`, where the
/// reference instant is the last access if `refresh_on_access` is enabled,
/// else the insertion instant.  Absent entries are evicted the next time
/// their key is touched, or by the background sweep if one is configured.
pub struct TimedCache<K, V> {
    inner:    Arc<Inner<K, V>>,
    _sweeper: Option<Sweeper>,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + Sync + 'static,
{
    pub fn builder() -> TimedCacheBuilder<K, V> {
        TimedCacheBuilder::default()
    }

    #[inline]
    fn now(&self) -> u64 {
        self.inner.clock.now_millis()
    }

    /// Insert or replace the value for `key`.
    pub fn put(&self, key: K, value: V) -> Arc<V> {
        let now = self.now();
        let value = Arc::new(value);
        let mut map = self.inner.shard(&key).lock();
        map.insert(key, self.inner.entry(Arc::clone(&value), now));
        value
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let now = self.now();
        let mut map = self.inner.shard(key).lock();
        self.inner.live(&mut map, key, now)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert `value` unless a live value exists.  Returns the existing
    /// value, or `None` if `value` was inserted.
    pub fn put_if_absent(&self, key: K, value: V) -> Option<Arc<V>> {
        let now = self.now();
        let mut map = self.inner.shard(&key).lock();
        if let Some(existing) = self.inner.live(&mut map, &key, now) {
            return Some(existing);
        }
        map.insert(key, self.inner.entry(Arc::new(value), now));
        None
    }

    /// Replace the value only if a live one exists.  Returns the new value
    /// when it was stored.
    pub fn put_if_present(&self, key: K, value: V) -> Option<Arc<V>> {
        let now = self.now();
        let mut map = self.inner.shard(&key).lock();
        self.inner.live(&mut map, &key, now)?;
        let value = Arc::new(value);
        map.insert(key, self.inner.entry(Arc::clone(&value), now));
        Some(value)
    }

    /// Return the live value, or compute, store and return a new one.
    pub fn get_or_compute(&self, key: K, compute: impl FnOnce(&K) -> V) -> Arc<V> {
        let now = self.now();
        let mut map = self.inner.shard(&key).lock();
        if let Some(existing) = self.inner.live(&mut map, &key, now) {
            return existing;
        }
        let value = Arc::new(compute(&key));
        map.insert(key, self.inner.entry(Arc::clone(&value), now));
        value
    }

    /// Remap a live value.  Nothing happens if the key is absent or expired.
    pub fn compute_if_present(&self, key: K, remap: impl FnOnce(&K, &V) -> V) -> Option<Arc<V>> {
        let now = self.now();
        let mut map = self.inner.shard(&key).lock();
        let current = self.inner.live(&mut map, &key, now)?;
        let value = Arc::new(remap(&key, &current));
        map.insert(key, self.inner.entry(Arc::clone(&value), now));
        Some(value)
    }

    /// Store `remap(key, current)` where `current` is the live value, if any.
    pub fn compute(&self, key: K, remap: impl FnOnce(&K, Option<&V>) -> V) -> Arc<V> {
        let now = self.now();
        let mut map = self.inner.shard(&key).lock();
        let current = self.inner.live(&mut map, &key, now);
        let value = Arc::new(remap(&key, current.as_deref()));
        map.insert(key, self.inner.entry(Arc::clone(&value), now));
        value
    }

    /// Remove the entry, returning its value if it was still live.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let now = self.now();
        let mut entry = self.inner.shard(key).lock().remove(key)?;
        entry.value(now, &self.inner.policy)
    }

    /// Number of stored entries, including expired ones that have not been
    /// evicted yet.
    pub fn len(&self) -> usize {
        self.inner.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in self.inner.shards.iter() {
            shard.lock().clear();
        }
    }

    /// Evict every expired entry now.  Returns the number evicted.
    pub fn cleanup(&self) -> usize {
        self.inner.cleanup()
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`TimedCache`].
///
/// ```rust,ignore
/// let cache: TimedCache<u64, String> = TimedCache::builder()
///     .timeout(Duration::from_secs(30))
///     .refresh_on_access(true)
///     .build()?;
/// ```
pub struct TimedCacheBuilder<K, V> {
    timeout:            Duration,
    refresh_on_access:  bool,
    retention:          Retention,
    keep_after_timeout: bool,
    cleanup_interval:   Option<Duration>,
    clock:              Option<Arc<dyn CacheClock>>,
    _types:             PhantomData<fn() -> (K, V)>,
}

impl<K, V> Default for TimedCacheBuilder<K, V> {
    fn default() -> Self {
        Self {
            timeout:            Duration::from_secs(60),
            refresh_on_access:  false,
            retention:          Retention::Strong,
            keep_after_timeout: false,
            cleanup_interval:   None,
            clock:              None,
            _types:             PhantomData,
        }
    }
}

impl<K, V> TimedCacheBuilder<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + Sync + 'static,
{
    /// Time after which an entry expires.  Zero means never (see [`Retention::Weak`]).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn refresh_on_access(mut self, refresh: bool) -> Self {
        self.refresh_on_access = refresh;
        self
    }

    pub fn retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// With weak retention, keep expired values readable while alive elsewhere.
    pub fn keep_after_timeout(mut self, keep: bool) -> Self {
        self.keep_after_timeout = keep;
        self
    }

    /// Period of the background sweep.  No sweeper thread is started without one.
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = Some(interval).filter(|d| !d.is_zero());
        self
    }

    pub fn clock(mut self, clock: Arc<dyn CacheClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> CacheResult<TimedCache<K, V>> {
        // Expiry runs on whole milliseconds.
        let timeout_ms = self.timeout.as_millis() as u64;
        if timeout_ms == 0
            && (self.retention != Retention::Weak || self.cleanup_interval.is_none())
        {
            return Err(CacheError::UnboundedRetention {
                retention: self.retention,
                cleanup:   self.cleanup_interval,
            });
        }

        let shards = (0..SHARD_COUNT)
            .map(|_| Mutex::new(FxHashMap::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let inner = Arc::new(Inner {
            shards,
            policy: Policy {
                timeout_ms,
                refresh:            self.refresh_on_access,
                retention:          self.retention,
                keep_after_timeout: self.keep_after_timeout,
            },
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
        });

        let sweeper = match self.cleanup_interval {
            Some(period) => {
                debug!(?period, "starting timed cache sweeper");
                Some(Sweeper::spawn(&inner, period)?)
            }
            None => None,
        };

        Ok(TimedCache { inner, _sweeper: sweeper })
    }
}
