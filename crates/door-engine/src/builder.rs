//! Fluent builder for constructing a [`DoorEngine`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use door_activity::{ActivityManager, AutoCloseScheduler, TickScheduler, ToggleEventSink};
use door_cache::{CacheClock, TimedCache};
use door_core::{Archetype, EngineConfig};
use door_types::{TypeDescriptor, TypeRegistry};

use crate::book::{DoorBook, EngineEvents};
use crate::{AutoCloseQueue, DoorEngine, EngineResult};

/// How long the last toggle of each door is remembered by default.
pub const DEFAULT_RECENT_TOGGLE_TTL: Duration = Duration::from_secs(60);

/// Fluent builder for [`DoorEngine`].
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                                     |
/// |---------------------------|---------------------------------------------|
/// | `.events(sink)`           | events are dropped                          |
/// | `.auto_close(scheduler)`  | built-in [`AutoCloseQueue`]                 |
/// | `.builtin_types(bool)`    | `true`: one type per archetype, ids 1..=7   |
/// | `.recent_toggle_ttl(d)`   | [`DEFAULT_RECENT_TOGGLE_TTL`]               |
/// | `.cache_clock(clock)`     | wall clock                                  |
///
/// # Example
///
/// ```rust,ignore
/// let engine = DoorEngineBuilder::new(load_config(path)?)
///     .events(Arc::new(MyEvents))
///     .build()?;
/// engine.add_door(door);
/// engine.request_toggle(&mut world, ToggleCommand::new(door_id, DoorActionType::Toggle));
/// loop { engine.tick(&mut world)?; }
/// ```
///
/// `build` must run on the host's mutation thread: that thread becomes the
/// only one allowed to toggle doors and drive ticks.
pub struct DoorEngineBuilder {
    config:            EngineConfig,
    events:            Option<Arc<dyn ToggleEventSink>>,
    auto_close:        Option<Arc<dyn AutoCloseScheduler>>,
    builtin_types:     bool,
    recent_toggle_ttl: Duration,
    cache_clock:       Option<Arc<dyn CacheClock>>,
}

impl DoorEngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            events:            None,
            auto_close:        None,
            builtin_types:     true,
            recent_toggle_ttl: DEFAULT_RECENT_TOGGLE_TTL,
            cache_clock:       None,
        }
    }

    /// Receive toggle-end and mover-stopped events.
    pub fn events(mut self, sink: Arc<dyn ToggleEventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Replace the built-in auto-close timer.
    pub fn auto_close(mut self, scheduler: Arc<dyn AutoCloseScheduler>) -> Self {
        self.auto_close = Some(scheduler);
        self
    }

    /// Register one built-in type per archetype, in [`Archetype::ALL`] order.
    pub fn builtin_types(mut self, enabled: bool) -> Self {
        self.builtin_types = enabled;
        self
    }

    pub fn recent_toggle_ttl(mut self, ttl: Duration) -> Self {
        self.recent_toggle_ttl = ttl;
        self
    }

    pub fn cache_clock(mut self, clock: Arc<dyn CacheClock>) -> Self {
        self.cache_clock = Some(clock);
        self
    }

    /// Validate the configuration and wire the engine together.
    pub fn build(self) -> EngineResult<DoorEngine> {
        self.config.validate()?;
        let config = Arc::new(self.config);
        let scheduler = Arc::new(TickScheduler::new());

        // ── Door records and recent toggles ───────────────────────────────
        let mut recent = TimedCache::builder().timeout(self.recent_toggle_ttl);
        if let Some(clock) = self.cache_clock {
            recent = recent.clock(clock);
        }
        let book = Arc::new(DoorBook::new(recent.build()?));

        let downstream: Arc<dyn ToggleEventSink> = match self.events {
            Some(sink) => sink,
            None => Arc::new(()),
        };
        let events = Arc::new(EngineEvents { book: Arc::clone(&book), downstream });

        // ── Auto-close ────────────────────────────────────────────────────
        let (queue, auto_close) = match self.auto_close {
            Some(custom) => (None, custom),
            None => {
                let queue = Arc::new(AutoCloseQueue::new(Arc::clone(&scheduler), config.ticks_per_second));
                let timer: Arc<dyn AutoCloseScheduler> = queue.clone();
                (Some(queue), timer)
            }
        };

        let activity = ActivityManager::new(scheduler.clone(), events, auto_close, config.clone());

        // ── Types ─────────────────────────────────────────────────────────
        let types = TypeRegistry::new();
        if self.builtin_types {
            let builtins = Archetype::ALL.into_iter().map(TypeDescriptor::builtin).collect();
            for result in types.register_batch(builtins) {
                result?;
            }
        }

        Ok(DoorEngine {
            config,
            scheduler,
            activity,
            types,
            book,
            auto_close: queue,
            live: Mutex::new(Vec::new()),
        })
    }
}
