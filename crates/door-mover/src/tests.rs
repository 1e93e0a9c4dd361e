//! Unit tests for door-mover.

#[cfg(test)]
mod helpers {
    use std::sync::{Arc, Mutex};

    use door_core::{
        Actor, Axis, BlockData, Cuboid, Door, DoorActionType, DoorId, DoorKind, EngineConfig, Orientation,
        RotateDirection, TypeId, Vector3Di,
    };

    use crate::{CompletionSink, MemoryWorld, Mover, MoverHandle, MoverReport, ToggleRequest};

    pub fn v(x: i32, y: i32, z: i32) -> Vector3Di {
        Vector3Di::new(x, y, z)
    }

    pub fn log_x() -> BlockData {
        BlockData::new("oak_log", Orientation::Axis(Axis::X))
    }

    /// 1 × 4 × 4 big door on the Z axis, hinged at the origin, opening
    /// clockwise.
    pub fn big_door() -> Door {
        Door::new(
            DoorId(7),
            "gate",
            TypeId(1),
            DoorKind::BigDoor { auto_close_secs: None },
            Cuboid::new(v(0, 0, 1), v(0, 3, 4)),
            v(0, 0, 0),
            RotateDirection::Clockwise,
        )
        .unwrap()
    }

    pub fn sliding_door() -> Door {
        Door::new(
            DoorId(8),
            "slider",
            TypeId(1),
            DoorKind::Sliding { blocks_to_move: 3, auto_close_secs: None },
            Cuboid::new(v(0, 0, 0), v(2, 1, 0)),
            v(0, 0, 0),
            RotateDirection::East,
        )
        .unwrap()
    }

    pub fn world_with(door: &Door, block: &BlockData) -> MemoryWorld {
        let mut world = MemoryWorld::new();
        world.fill(&door.cuboid, block);
        world
    }

    #[derive(Default)]
    pub struct Recorder {
        pub reports: Mutex<Vec<(MoverReport, bool)>>,
    }

    impl CompletionSink for Recorder {
        fn on_mover_finished(&self, _mover: &MoverHandle, report: MoverReport, allow_reschedule: bool) {
            self.reports.lock().unwrap().push((report, allow_reschedule));
        }
    }

    impl Recorder {
        pub fn single(&self) -> (MoverReport, bool) {
            let reports = self.reports.lock().unwrap();
            assert_eq!(reports.len(), 1, "expected exactly one report");
            reports[0].clone()
        }
    }

    pub fn mover(door: Door, world: &mut MemoryWorld, secs: f64, skip: bool) -> (Mover, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let request = ToggleRequest::new(door, DoorActionType::Toggle, Actor::Server)
            .with_duration(secs)
            .skipping_animation(skip);
        let mover = Mover::new(request, world, &EngineConfig::default(), recorder.clone()).unwrap();
        (mover, recorder)
    }

    /// Tick until the mover has reported; returns the number of ticks.
    pub fn run_to_end(mover: &mut Mover, world: &mut MemoryWorld) -> u64 {
        let mut ticks = 0;
        while !mover.is_finished() {
            mover.tick(world);
            world.step_entities();
            ticks += 1;
            assert!(ticks < 10_000, "mover never finished");
        }
        ticks
    }

    pub fn sorted_blocks(world: &MemoryWorld) -> Vec<(Vector3Di, BlockData)> {
        let mut blocks: Vec<_> = world.blocks().map(|(p, b)| (p, b.clone())).collect();
        blocks.sort_by_key(|(p, _)| *p);
        blocks
    }
}

// ── Timing ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod timing {
    use door_core::EngineConfig;

    use crate::AnimationTiming;

    #[test]
    fn requested_duration_within_speed_bounds_is_kept() {
        let t = AnimationTiming::compute(2.0, 10.0, &EngineConfig::default());
        assert_eq!(t.duration_secs, 2.0);
        assert_eq!(t.total_steps, 40);
        assert_eq!(t.replace_step(), 20);
    }

    #[test]
    fn instant_request_runs_at_max_speed() {
        let t = AnimationTiming::compute(0.0, 10.0, &EngineConfig::default());
        assert_eq!(t.duration_secs, 1.0);
        assert_eq!(t.total_steps, 20);
    }

    #[test]
    fn slow_request_is_capped() {
        let t = AnimationTiming::compute(1000.0, 10.0, &EngineConfig::default());
        assert_eq!(t.duration_secs, 60.0);
        assert_eq!(t.total_steps, 1200);
    }

    #[test]
    fn stationary_door_uses_requested_duration() {
        let t = AnimationTiming::compute(3.0, 0.0, &EngineConfig::default());
        assert_eq!(t.total_steps, 60);
        let t = AnimationTiming::compute(f64::NAN, 0.0, &EngineConfig::default());
        assert_eq!(t.total_steps, 1);
        assert_eq!(t.progress(1), 1.0);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use door_core::{Axis, BlockData, Orientation, RotationClass};
    use door_geometry::Trajectory;

    use super::helpers::{big_door, log_x, mover, run_to_end, sorted_blocks, v, world_with};
    use crate::MoverState;

    #[test]
    fn big_door_quarter_turn_round_trip() {
        let door = big_door();
        let mut world = world_with(&door, &BlockData::simple("planks"));
        let (mut m, recorder) = mover(door, &mut world, 2.0, false);
        let steps = m.timing().total_steps;

        assert_eq!(m.state(), MoverState::Pending);
        let ticks = run_to_end(&mut m, &mut world);
        assert_eq!(ticks, steps + 2);
        assert_eq!(m.state(), MoverState::Done);

        for y in 0..=3 {
            for k in 1..=4 {
                assert!(world.block(v(0, y, k)).is_none(), "old cell ({y}, {k}) not cleared");
                assert_eq!(world.block(v(-k, y, 0)), Some(&BlockData::simple("planks")));
            }
        }
        assert_eq!(world.block_count(), 16);
        assert_eq!(world.entity_count(), 0);

        let (report, allow) = recorder.single();
        assert!(allow);
        assert!(report.door.is_open);
        assert_eq!((report.door.cuboid.min(), report.door.cuboid.max()), (v(-4, 0, 0), v(-1, 3, 0)));
        assert_eq!(report.aborted, None);
    }

    #[test]
    fn skip_and_full_animation_place_identically() {
        let door = big_door();
        let mut full = world_with(&door, &log_x());
        let mut skip = full.clone();

        let (mut a, _) = mover(door.clone(), &mut full, 2.0, false);
        let (mut b, recorder) = mover(door, &mut skip, 2.0, true);

        assert!(run_to_end(&mut a, &mut full) > 1);
        assert_eq!(run_to_end(&mut b, &mut skip), 1);
        assert_eq!(sorted_blocks(&full), sorted_blocks(&skip));
        assert_eq!(skip.spawned_count(), 0);
        assert!(recorder.single().0.skipped);
    }

    #[test]
    fn turned_blocks_are_written_turned() {
        let door = big_door();
        let mut world = world_with(&door, &log_x());
        let (mut m, _) = mover(door, &mut world, 1.0, false);
        run_to_end(&mut m, &mut world);
        assert_eq!(
            world.block(v(-2, 1, 0)).map(|b| b.orientation),
            Some(Orientation::Axis(Axis::Z))
        );
    }

    #[test]
    fn blocks_are_not_written_while_animating() {
        let door = big_door();
        let mut world = world_with(&door, &BlockData::simple("planks"));
        let (mut m, _) = mover(door, &mut world, 2.0, false);

        m.tick(&mut world);
        assert_eq!(m.state(), MoverState::Animating);
        assert_eq!(world.block_count(), 0);
        assert_eq!(world.entity_count(), 16);
        for _ in 0..5 {
            m.tick(&mut world);
            assert_eq!(world.block_count(), 0);
        }
    }

    #[test]
    fn velocities_are_zeroed_before_placement() {
        let door = big_door();
        let mut world = world_with(&door, &BlockData::simple("planks"));
        let (mut m, _) = mover(door, &mut world, 1.0, false);
        let steps = m.timing().total_steps;

        m.tick(&mut world);
        m.tick(&mut world);
        assert!(world.entities().any(|(_, e)| e.velocity.length() > 0.0));

        for _ in 1..steps {
            m.tick(&mut world);
        }
        assert_eq!(m.state(), MoverState::Finishing);
        assert_eq!(world.entity_count(), 16);
        assert!(world.entities().all(|(_, e)| e.velocity.length() == 0.0));
        assert_eq!(world.block_count(), 0);

        assert_eq!(m.tick(&mut world), MoverState::Done);
        assert_eq!(world.block_count(), 16);
    }

    #[test]
    fn entities_follow_the_arc() {
        let door = big_door();
        let mut world = world_with(&door, &BlockData::simple("planks"));
        let (mut m, _) = mover(door, &mut world, 2.0, false);
        let steps = m.timing().total_steps;
        let geometry = m.geometry().clone();
        let tip = geometry.origin(v(0, 0, 4));

        // Start plus all interpolation steps; entities still exist.
        for _ in 0..=steps {
            m.tick(&mut world);
            world.step_entities();
        }
        let end = geometry.pose_at(&tip, 1.0);
        let closest = world
            .entities()
            .map(|(_, e)| (e.position - end).length())
            .fold(f64::INFINITY, f64::min);
        assert!(closest < 0.5, "tip entity ended {closest} blocks from its target");
    }

    #[test]
    fn finished_mover_ignores_further_ticks() {
        let door = big_door();
        let mut world = world_with(&door, &BlockData::simple("planks"));
        let (mut m, recorder) = mover(door, &mut world, 0.0, true);
        run_to_end(&mut m, &mut world);
        assert_eq!(m.tick(&mut world), MoverState::Done);
        assert_eq!(recorder.reports.lock().unwrap().len(), 1);
        assert!(!m.handle().abort());
    }

    #[test]
    fn snapshot_records_rotation_class() {
        let door = big_door();
        let mut world = world_with(&door, &log_x());
        world.set_block(v(0, 0, 1), BlockData::simple("planks"));
        world.set_block(v(0, 3, 4), BlockData::air());
        let (m, _) = mover(door, &mut world, 1.0, false);
        assert_eq!(m.snapshot().len(), 15);
        assert_eq!(m.snapshot().blocks()[0].rotation_class, RotationClass::None);
        assert_eq!(m.snapshot().blocks()[1].rotation_class, RotationClass::Axial);
    }
}

// ── Midpoint replace ──────────────────────────────────────────────────────────

#[cfg(test)]
mod replace {
    use door_core::{Axis, BlockData, Orientation};

    use super::helpers::{big_door, log_x, mover, run_to_end, sliding_door, world_with};

    #[test]
    fn turned_blocks_are_respawned_once() {
        let door = big_door();
        let mut world = world_with(&door, &log_x());
        let (mut m, _) = mover(door, &mut world, 2.0, false);
        let replace_at = m.timing().replace_step();

        for _ in 0..=replace_at {
            m.tick(&mut world);
        }
        assert_eq!(world.spawned_count(), 32);
        assert_eq!(world.entity_count(), 16);
        assert!(world.entities().all(|(_, e)| e.block.orientation == Orientation::Axis(Axis::Z)));

        run_to_end(&mut m, &mut world);
        assert_eq!(world.spawned_count(), 32);
    }

    #[test]
    fn orientation_updates_avoid_respawning() {
        let door = big_door();
        let mut world = world_with(&door, &log_x()).with_orientation_updates(true);
        let (mut m, _) = mover(door, &mut world, 2.0, false);
        let replace_at = m.timing().replace_step();

        for _ in 0..=replace_at {
            m.tick(&mut world);
        }
        assert_eq!(world.spawned_count(), 16);
        assert!(world.entities().all(|(_, e)| e.block.orientation == Orientation::Axis(Axis::Z)));
    }

    #[test]
    fn plain_blocks_are_not_replaced() {
        let door = big_door();
        let mut world = world_with(&door, &BlockData::simple("planks"));
        let (mut m, _) = mover(door, &mut world, 2.0, false);
        run_to_end(&mut m, &mut world);
        assert_eq!(world.spawned_count(), 16);
    }

    #[test]
    fn sliding_never_turns_blocks() {
        let door = sliding_door();
        let mut world = world_with(&door, &log_x());
        let (mut m, _) = mover(door, &mut world, 1.0, false);
        run_to_end(&mut m, &mut world);
        assert_eq!(world.spawned_count(), 6);
        assert!(world.blocks().all(|(_, b)| b.orientation == Orientation::Axis(Axis::X)));
    }
}

// ── Abort ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod abort {
    use door_core::BlockData;

    use super::helpers::{big_door, mover, sorted_blocks, v, world_with};
    use crate::{AbortReason, MoverState};

    #[test]
    fn abort_before_start_leaves_world_untouched() {
        let door = big_door();
        let mut world = world_with(&door, &BlockData::simple("planks"));
        let before = sorted_blocks(&world);
        let (mut m, recorder) = mover(door.clone(), &mut world, 2.0, false);

        let handle = m.handle().clone();
        std::thread::spawn(move || assert!(handle.abort())).join().unwrap();
        assert_eq!(m.state(), MoverState::Aborted);

        assert_eq!(m.tick(&mut world), MoverState::Aborted);
        assert!(m.is_finished());
        assert_eq!(sorted_blocks(&world), before);
        assert_eq!(world.spawned_count(), 0);

        let (report, allow) = recorder.single();
        assert!(!allow);
        assert_eq!(report.aborted, Some(AbortReason::Abort));
        assert_eq!(report.door, door);
    }

    #[test]
    fn abort_mid_animation_puts_blocks_down() {
        let door = big_door();
        let mut world = world_with(&door, &BlockData::simple("planks"));
        let (mut m, recorder) = mover(door, &mut world, 2.0, false);
        for _ in 0..5 {
            m.tick(&mut world);
        }
        assert!(m.handle().abort());
        assert!(!m.handle().abort());

        m.tick(&mut world);
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.block_count(), 16);
        assert!(world.block(v(-4, 3, 0)).is_some());

        let (report, allow) = recorder.single();
        assert!(!allow);
        assert!(report.door.is_open);
        m.tick(&mut world);
        assert_eq!(recorder.reports.lock().unwrap().len(), 1);
    }

    #[test]
    fn restart_and_shutdown_are_reported() {
        for reason in [AbortReason::Restart, AbortReason::Shutdown] {
            let door = big_door();
            let mut world = world_with(&door, &BlockData::simple("planks"));
            let (mut m, recorder) = mover(door, &mut world, 2.0, false);
            m.tick(&mut world);
            let requested = match reason {
                AbortReason::Restart => m.handle().restart(),
                _ => m.handle().shutdown(),
            };
            assert!(requested);
            m.tick(&mut world);
            assert_eq!(m.handle().abort_reason(), Some(reason));
            assert_eq!(recorder.single().0.aborted, Some(reason));
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use std::sync::Arc;

    use door_core::{
        Actor, BlockData, Cuboid, Door, DoorActionType, DoorId, DoorKind, EngineConfig, RotateDirection, TypeId,
        Vector3Di,
    };
    use door_geometry::GeometryError;

    use super::helpers::{big_door, mover, run_to_end, sorted_blocks, v, world_with, Recorder};
    use crate::{MemoryWorld, Mover, MoverError, ToggleRequest};

    fn garage(a: Vector3Di, b: Vector3Di, dir: RotateDirection) -> Door {
        Door::new(
            DoorId(9),
            "shutter",
            TypeId(1),
            DoorKind::Garage { auto_close_secs: None },
            Cuboid::new(a, b),
            a,
            dir,
        )
        .unwrap()
    }

    fn assert_garage_rejected(door: Door) {
        let mut world = world_with(&door, &BlockData::simple("oak_planks"));
        let before = sorted_blocks(&world);
        let request = ToggleRequest::new(door, DoorActionType::Toggle, Actor::Server).skipping_animation(true);
        let err = Mover::new(request, &mut world, &EngineConfig::default(), Arc::new(Recorder::default()))
            .unwrap_err();
        assert!(matches!(err, MoverError::Geometry(GeometryError::InvalidParameter { .. })));
        assert_eq!(sorted_blocks(&world), before);
    }

    #[test]
    fn empty_door_is_rejected() {
        let mut world = MemoryWorld::new();
        let request = ToggleRequest::new(big_door(), DoorActionType::Open, Actor::Server);
        let err = Mover::new(request, &mut world, &EngineConfig::default(), Arc::new(Recorder::default()))
            .unwrap_err();
        assert!(matches!(err, MoverError::InvalidGeometryPrecondition { .. }));
    }

    #[test]
    fn closing_a_closed_door_is_rejected() {
        let mut world = MemoryWorld::new();
        let request = ToggleRequest::new(big_door(), DoorActionType::Close, Actor::Server);
        let err = Mover::new(request, &mut world, &EngineConfig::default(), Arc::new(Recorder::default()))
            .unwrap_err();
        assert!(matches!(err, MoverError::Geometry(GeometryError::AlreadyInState { .. })));
    }

    #[test]
    fn garage_opening_along_its_width_keeps_the_world() {
        assert_garage_rejected(garage(v(0, 0, 0), v(3, 3, 0), RotateDirection::East));
    }

    #[test]
    fn thick_garage_keeps_the_world() {
        assert_garage_rejected(garage(v(0, 0, 0), v(2, 2, 1), RotateDirection::South));
    }

    #[test]
    fn flat_garage_keeps_every_block() {
        let door = garage(v(0, 0, 0), v(3, 3, 0), RotateDirection::South);
        let mut world = world_with(&door, &BlockData::simple("oak_planks"));
        let (mut m, _recorder) = mover(door, &mut world, 1.0, true);
        run_to_end(&mut m, &mut world);
        assert_eq!(world.blocks().count(), 16);
    }
}
