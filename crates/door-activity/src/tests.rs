//! Unit tests for door-activity.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use door_core::{
        Actor, BlockData, Cuboid, Door, DoorActionType, DoorId, DoorKind, EngineConfig, RotateDirection, TypeId,
        Vector3Di,
    };
    use door_mover::{AbortReason, MemoryWorld, Mover, ToggleRequest};

    use crate::{ActivityManager, AutoCloseScheduler, TickScheduler, ToggleEnd, ToggleEventSink};

    #[derive(Default)]
    pub struct Events {
        pub ends:    Mutex<Vec<ToggleEnd>>,
        pub stopped: Mutex<Vec<(DoorId, AbortReason)>>,
    }

    impl ToggleEventSink for Events {
        fn emit_toggle_end(&self, event: &ToggleEnd) {
            self.ends.lock().push(event.clone());
        }

        fn emit_mover_stopped(&self, event: &ToggleEnd, reason: AbortReason) {
            self.stopped.lock().push((event.door_id, reason));
        }
    }

    #[derive(Default)]
    pub struct AutoClose {
        pub calls: Mutex<Vec<(DoorId, bool, bool)>>,
    }

    impl AutoCloseScheduler for AutoClose {
        fn schedule_auto_close(&self, _actor: &Actor, door: &Door, _duration_secs: f64, skip: bool) {
            self.calls.lock().push((door.id, door.is_open, skip));
        }
    }

    pub struct Fixture {
        pub scheduler:  Arc<TickScheduler>,
        pub events:     Arc<Events>,
        pub auto_close: Arc<AutoClose>,
        pub manager:    ActivityManager,
    }

    impl Fixture {
        pub fn new() -> Self {
            let scheduler = Arc::new(TickScheduler::new());
            let events = Arc::new(Events::default());
            let auto_close = Arc::new(AutoClose::default());
            let manager = ActivityManager::new(
                scheduler.clone(),
                events.clone(),
                auto_close.clone(),
                Arc::new(EngineConfig::default()),
            );
            Self { scheduler, events, auto_close, manager }
        }

        pub fn advance(&self, ticks: u64) {
            for _ in 0..ticks {
                self.scheduler.advance().unwrap();
            }
        }

        /// Claim the door, build its mover and attach it.
        pub fn start(&self, world: &mut MemoryWorld, door: Door, skip: bool) -> Mover {
            let id = door.id;
            assert!(self.manager.try_mark_busy(id));
            world.fill(&door.cuboid, &BlockData::simple("iron_block"));
            let request = ToggleRequest::new(door, DoorActionType::Toggle, Actor::Server)
                .with_duration(1.0)
                .skipping_animation(skip);
            let mover =
                Mover::new(request, world, &EngineConfig::default(), Arc::new(self.manager.clone())).unwrap();
            self.manager.attach_mover(id, mover.handle().clone()).unwrap();
            mover
        }
    }

    pub fn v(x: i32, y: i32, z: i32) -> Vector3Di {
        Vector3Di::new(x, y, z)
    }

    pub fn sliding(id: u64) -> Door {
        Door::new(
            DoorId(id),
            "slider",
            TypeId(1),
            DoorKind::Sliding { blocks_to_move: 2, auto_close_secs: Some(5) },
            Cuboid::new(v(0, 0, id as i32 * 10), v(1, 1, id as i32 * 10)),
            Vector3Di::ZERO,
            RotateDirection::Up,
        )
        .unwrap()
    }

    pub fn flag(id: u64) -> Door {
        Door::new(
            DoorId(id),
            "banner",
            TypeId(2),
            DoorKind::Flag { amplitude: 1.0, waves: 1 },
            Cuboid::new(v(1, 5, 0), v(4, 6, 0)),
            v(0, 5, 0),
            RotateDirection::None,
        )
        .unwrap()
    }

    pub fn drive(mover: &mut Mover, world: &mut MemoryWorld) {
        let mut ticks = 0;
        while !mover.is_finished() {
            mover.tick(world);
            ticks += 1;
            assert!(ticks < 10_000);
        }
    }
}

// ── Task queue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod task_queue {
    use door_core::Tick;

    use crate::TaskQueue;

    #[test]
    fn drains_everything_due_in_tick_order() {
        let mut q = TaskQueue::new();
        q.push(Tick(5), "c");
        q.push(Tick(2), "a");
        q.push(Tick(2), "b");
        q.push(Tick(9), "d");
        assert_eq!(q.len(), 4);
        assert_eq!(q.tick_count(), 3);
        assert_eq!(q.next_tick(), Some(Tick(2)));

        assert!(q.drain_due(Tick(1)).is_empty());
        assert_eq!(q.drain_due(Tick(5)), vec!["a", "b", "c"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_tick(), Some(Tick(9)));
    }

    #[test]
    fn drain_at_the_end_of_time() {
        let mut q = TaskQueue::new();
        q.push(Tick(u64::MAX), 1);
        assert_eq!(q.drain_due(Tick(u64::MAX)), vec![1]);
        assert!(q.is_empty());
    }

    #[test]
    fn remove_where_keeps_counts() {
        let mut q = TaskQueue::new();
        for i in 0..10u32 {
            q.push(Tick(u64::from(i % 3)), i);
        }
        assert_eq!(q.remove_where(|i| i % 2 == 0), 5);
        assert_eq!(q.len(), 5);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.tick_count(), 0);
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use door_core::Tick;

    use crate::{ActivityError, TickScheduler, WorldMutationScheduler};

    #[test]
    fn delayed_tasks_run_on_their_tick() {
        let s = TickScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let r = ran.clone();
        s.run_on_mutation_context_later(Box::new(move || { r.fetch_add(1, Ordering::SeqCst); }), 3);
        assert_eq!(s.next_due(), Some(Tick(3)));

        assert_eq!(s.advance().unwrap(), 0);
        assert_eq!(s.advance().unwrap(), 0);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(s.advance().unwrap(), 1);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(s.now(), Tick(3));
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn on_context_submission_runs_immediately() {
        let s = TickScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let r = ran.clone();
        s.run_on_mutation_context(Box::new(move || { r.fetch_add(1, Ordering::SeqCst); }));
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn off_context_submission_waits_for_the_next_tick() {
        let s = Arc::new(TickScheduler::new());
        let ran = Arc::new(AtomicUsize::new(0));
        std::thread::scope(|scope| {
            scope.spawn(|| {
                assert!(!s.is_mutation_context());
                let r = ran.clone();
                s.run_on_mutation_context(Box::new(move || { r.fetch_add(1, Ordering::SeqCst); }));
                assert_eq!(
                    s.advance(),
                    Err(ActivityError::WrongExecutionContext { operation: "TickScheduler::advance" })
                );
            });
        });
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(s.advance().unwrap(), 1);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tasks_may_schedule_more_tasks() {
        let s = Arc::new(TickScheduler::new());
        let ran = Arc::new(AtomicUsize::new(0));
        let (s2, r) = (s.clone(), ran.clone());
        s.run_on_mutation_context_later(
            Box::new(move || {
                let r2 = r.clone();
                s2.run_on_mutation_context_later(Box::new(move || { r2.fetch_add(1, Ordering::SeqCst); }), 1);
            }),
            1,
        );
        s.advance().unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        s.advance().unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}

// ── Busy table ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod busy {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use door_core::DoorId;
    use door_mover::MemoryWorld;

    use super::helpers::{sliding, Fixture};
    use crate::ActivityError;

    #[test]
    fn exactly_one_concurrent_claim_wins() {
        let f = Fixture::new();
        let wins = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..32 {
                scope.spawn(|| {
                    if f.manager.try_mark_busy(DoorId(1)) {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });
        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert!(f.manager.is_busy(DoorId(1)));
    }

    #[test]
    fn mark_available_is_idempotent() {
        let f = Fixture::new();
        assert!(f.manager.try_mark_busy(DoorId(3)));
        f.manager.mark_available(DoorId(3));
        f.manager.mark_available(DoorId(3));
        assert!(!f.manager.is_busy(DoorId(3)));
        assert!(f.manager.try_mark_busy(DoorId(3)));
    }

    #[test]
    fn attaching_to_an_idle_door_is_refused() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mover = f.start(&mut world, sliding(1), false);
        f.manager.mark_available(DoorId(1));

        assert_eq!(
            f.manager.attach_mover(DoorId(1), mover.handle().clone()),
            Err(ActivityError::NotBusy(DoorId(1)))
        );
        assert!(!f.manager.is_busy(DoorId(1)));
    }

    #[test]
    fn stop_between_claim_and_attach_refuses_the_mover() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mover = f.start(&mut world, sliding(1), false);
        assert!(f.manager.try_mark_busy(DoorId(2)));

        assert_eq!(f.manager.stop_all(), 1);
        assert_eq!(
            f.manager.attach_mover(DoorId(2), mover.handle().clone()),
            Err(ActivityError::NotBusy(DoorId(2)))
        );
        assert_eq!(f.manager.busy_count(), 0);
        assert!(f.manager.try_mark_busy(DoorId(2)));
    }

    #[test]
    fn placeholder_then_live_handle() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mover = f.start(&mut world, sliding(2), false);
        let stored = f.manager.get_mover(DoorId(2)).unwrap();
        assert!(stored.same_mover(mover.handle()));
        assert_eq!(f.manager.busy_count(), 1);

        assert!(f.manager.try_mark_busy(DoorId(9)));
        assert!(f.manager.get_mover(DoorId(9)).is_none());
        assert!(f.manager.is_busy(DoorId(9)));
    }

    #[test]
    fn off_context_construction_releases_the_claim() {
        let f = Fixture::new();
        assert!(f.manager.try_mark_busy(DoorId(4)));
        std::thread::scope(|scope| {
            scope.spawn(|| {
                let err = f.manager.require_mutation_context(DoorId(4), "build mover").unwrap_err();
                assert!(matches!(err, ActivityError::WrongExecutionContext { .. }));
            });
        });
        assert!(!f.manager.is_busy(DoorId(4)));
        assert!(f.manager.require_mutation_context(DoorId(4), "build mover").is_ok());
    }
}

// ── Completion ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod completion {
    use door_core::{DoorId, MINIMUM_DOOR_DELAY_TICKS};
    use door_mover::{AbortReason, MemoryWorld};

    use super::helpers::{drive, flag, sliding, Fixture};
    use crate::Restartable;

    #[test]
    fn door_is_released_after_the_settle_delay() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mut mover = f.start(&mut world, sliding(1), false);
        drive(&mut mover, &mut world);

        assert!(f.manager.is_busy(DoorId(1)));
        f.advance(MINIMUM_DOOR_DELAY_TICKS - 1);
        assert!(f.manager.is_busy(DoorId(1)));
        assert!(f.events.ends.lock().is_empty());
        f.advance(1);
        assert!(!f.manager.is_busy(DoorId(1)));

        let ends = f.events.ends.lock();
        assert_eq!(ends.len(), 1);
        assert!(ends[0].door.is_open);
        assert!(!ends[0].skipped);
    }

    #[test]
    fn skipped_animation_waits_longer() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mut mover = f.start(&mut world, sliding(1), true);
        drive(&mut mover, &mut world);

        f.advance(MINIMUM_DOOR_DELAY_TICKS);
        assert!(f.manager.is_busy(DoorId(1)));
        f.advance(40);
        assert!(!f.manager.is_busy(DoorId(1)));
        assert!(f.events.ends.lock()[0].skipped);
    }

    #[test]
    fn timer_toggleable_door_schedules_one_auto_close() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mut mover = f.start(&mut world, sliding(1), false);
        drive(&mut mover, &mut world);
        f.advance(MINIMUM_DOOR_DELAY_TICKS * 2);

        assert_eq!(*f.auto_close.calls.lock(), vec![(DoorId(1), true, false)]);
    }

    #[test]
    fn aborted_mover_schedules_nothing() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mut mover = f.start(&mut world, sliding(1), false);
        mover.tick(&mut world);
        assert!(mover.handle().abort());
        drive(&mut mover, &mut world);
        f.advance(MINIMUM_DOOR_DELAY_TICKS);

        assert!(f.auto_close.calls.lock().is_empty());
        assert!(f.events.ends.lock().is_empty());
        assert_eq!(*f.events.stopped.lock(), vec![(DoorId(1), AbortReason::Abort)]);
        assert!(!f.manager.is_busy(DoorId(1)));
    }

    #[test]
    fn perpetual_door_is_not_auto_closed() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mut mover = f.start(&mut world, flag(5), false);
        drive(&mut mover, &mut world);
        f.advance(MINIMUM_DOOR_DELAY_TICKS);

        assert_eq!(f.events.ends.lock().len(), 1);
        assert!(f.auto_close.calls.lock().is_empty());
    }

    #[test]
    fn stale_completion_leaves_a_new_claim_alone() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let mut old = f.start(&mut world, sliding(1), false);
        old.tick(&mut world);

        assert_eq!(f.manager.stop_all(), 1);
        assert!(!f.manager.is_busy(DoorId(1)));
        assert!(f.manager.try_mark_busy(DoorId(1)));

        drive(&mut old, &mut world);
        f.advance(MINIMUM_DOOR_DELAY_TICKS);
        assert!(f.manager.is_busy(DoorId(1)));
    }

    #[test]
    fn restart_and_shutdown_signal_every_live_mover() {
        let f = Fixture::new();
        let mut world = MemoryWorld::new();
        let a = f.start(&mut world, sliding(1), false);
        let b = f.start(&mut world, sliding(2), false);
        assert!(f.manager.try_mark_busy(DoorId(3)));

        f.manager.restart();
        assert_eq!(f.manager.busy_count(), 0);
        assert_eq!(a.handle().abort_reason(), Some(AbortReason::Restart));
        assert_eq!(b.handle().abort_reason(), Some(AbortReason::Restart));

        let c = f.start(&mut world, sliding(4), false);
        f.manager.shutdown();
        assert_eq!(c.handle().abort_reason(), Some(AbortReason::Shutdown));
        assert_eq!(f.manager.shutdown_all(), 0);
    }
}
