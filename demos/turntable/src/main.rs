//! turntable — drives one door of every archetype through an in-memory world.
//!
//! Every door is toggled once at tick 0; the sliding portcullis then closes
//! itself again after its auto-close delay.  Pass a TOML config path as the
//! first argument to override the built-in engine settings, and set
//! `RUST_LOG=door_engine=debug` to watch the engine's bookkeeping.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use door_activity::{ToggleEnd, ToggleEventSink};
use door_core::{
    Actor, BlockData, Cuboid, Door, DoorActionType, DoorId, DoorKind, RotateDirection, Vector3Di,
};
use door_engine::{DoorEngine, DoorEngineBuilder, ToggleCommand, config_from_str, load_config};
use door_mover::{AbortReason, MemoryWorld};

// ── Constants ─────────────────────────────────────────────────────────────────

const MAX_TICKS: u64 = 2_000;

const CONFIG_TOML: &str = "\
ticks_per_second = 20
cool_down_ticks  = 10
max_speed        = 8.0
";

// Extra door types layered on the built-in archetypes.
const TYPES_CSV: &str = "\
name,version,archetype,dependency,min_version,max_version\n\
Portcullis,1,SlidingDoor,SlidingDoor,1,1\n\
Windmill,2,RevolvingDoor,,,\n\
";

// ── Event journal ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Journal {
    finished: AtomicUsize,
    stopped:  AtomicUsize,
}

impl ToggleEventSink for Journal {
    fn emit_toggle_end(&self, event: &ToggleEnd) {
        self.finished.fetch_add(1, Ordering::Relaxed);
        info!(
            door   = %event.door_id,
            name   = %event.door.name,
            action = %event.action,
            cause  = ?event.cause,
            actor  = %event.actor,
            open   = event.door.is_open,
            "toggle finished"
        );
    }

    fn emit_mover_stopped(&self, event: &ToggleEnd, reason: AbortReason) {
        self.stopped.fetch_add(1, Ordering::Relaxed);
        info!(door = %event.door_id, ?reason, "mover stopped");
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

fn v(x: i32, y: i32, z: i32) -> Vector3Di {
    Vector3Di::new(x, y, z)
}

fn build_doors(engine: &DoorEngine) -> Result<Vec<Door>> {
    let type_of = |name: &str| {
        engine
            .types()
            .id_of(name)
            .with_context(|| format!("door type {name} is not registered"))
    };

    let doors = vec![
        Door::new(
            DoorId(1),
            "gate",
            type_of("BigDoor")?,
            DoorKind::BigDoor { auto_close_secs: None },
            Cuboid::new(v(0, 0, 1), v(0, 3, 4)),
            v(0, 0, 0),
            RotateDirection::Clockwise,
        )?,
        Door::new(
            DoorId(2),
            "bridge",
            type_of("Drawbridge")?,
            DoorKind::Drawbridge { auto_close_secs: None },
            Cuboid::new(v(10, 0, 0), v(13, 4, 0)),
            v(10, 0, 0),
            RotateDirection::North,
        )?,
        Door::new(
            DoorId(3),
            "portcullis",
            type_of("Portcullis")?,
            DoorKind::Sliding { blocks_to_move: 3, auto_close_secs: Some(2) },
            Cuboid::new(v(20, 0, 0), v(22, 2, 0)),
            v(20, 0, 0),
            RotateDirection::Up,
        )?,
        Door::new(
            DoorId(4),
            "lobby",
            type_of("Windmill")?,
            DoorKind::Revolving { quarter_circles: 0 },
            Cuboid::new(v(28, 0, 30), v(32, 2, 30)),
            v(30, 0, 30),
            RotateDirection::CounterClockwise,
        )?,
        Door::new(
            DoorId(5),
            "garage",
            type_of("GarageDoor")?,
            DoorKind::Garage { auto_close_secs: None },
            Cuboid::new(v(40, 0, 0), v(42, 2, 0)),
            v(40, 0, 0),
            RotateDirection::South,
        )?,
        Door::new(
            DoorId(6),
            "banner",
            type_of("Flag")?,
            DoorKind::Flag { amplitude: 1.0, waves: 2 },
            Cuboid::new(v(51, 5, 0), v(56, 8, 0)),
            v(50, 5, 0),
            RotateDirection::None,
        )?,
        Door::new(
            DoorId(7),
            "tower clock",
            type_of("Clock")?,
            DoorKind::Clock { quarter_turns: 0 },
            Cuboid::new(v(60, 0, 0), v(60, 4, 4)),
            v(60, 2, 2),
            RotateDirection::Clockwise,
        )?,
    ];
    Ok(doors)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "turntable=info,door_engine=info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => config_from_str(CONFIG_TOML)?,
    };
    info!(?config, "engine configuration");

    let journal = Arc::new(Journal::default());
    let engine = DoorEngineBuilder::new(config).events(journal.clone()).build()?;

    let descriptors = door_types::load_descriptors_reader(Cursor::new(TYPES_CSV))?;
    for result in engine.register_door_type_batch(descriptors) {
        let id = result?;
        info!(%id, "registered door type");
    }

    let mut world = MemoryWorld::new();
    let doors = build_doors(&engine)?;
    for door in doors {
        world.fill(&door.cuboid, &BlockData::simple("oak_planks"));
        info!(%door, "placed door");
        engine.add_door(door);
    }
    let placed = world.block_count();

    let actor = Actor::player("00000000-0000-0000-0000-000000000001", "keeper");
    for id in engine.door_ids() {
        let command = ToggleCommand::new(id, DoorActionType::Toggle).by(actor.clone()).duration(2.5);
        let outcome = engine.request_toggle(&mut world, command);
        info!(door = %id, ?outcome, "toggle requested");
    }

    let mut ticks = 0;
    loop {
        let live = engine.tick(&mut world)?;
        ticks += 1;
        let busy = engine.door_ids().into_iter().any(|id| engine.query_busy(id));
        let pending = engine.auto_close_queue().is_some_and(|q| !q.is_empty());
        if live == 0 && !busy && !pending {
            break;
        }
        if ticks >= MAX_TICKS {
            bail!("doors still moving after {MAX_TICKS} ticks");
        }
    }

    println!("=== turntable ===");
    println!("ticks run        : {ticks}");
    println!("toggles finished : {}", journal.finished.load(Ordering::Relaxed));
    println!("movers stopped   : {}", journal.stopped.load(Ordering::Relaxed));
    println!("blocks placed    : {placed} -> {} after the run", world.block_count());
    println!("entities spawned : {}", world.spawned_count());
    for id in engine.door_ids() {
        if let Some(door) = engine.door(id) {
            println!("  {door}  open={}", door.is_open);
        }
    }
    Ok(())
}
