//! Детерминизм: одинаковый seed и сценарий ⇒ бит-в-бит одинаковые траектории
//!
//! Фиксированный сценарий восприятия/урона на фиксированных тиках; сравниваем
//! снапшоты blackboard'ов и веер видимости между прогонами.

use bevy::prelude::*;
use sightline_simulation::{
    create_headless_app, step_simulation, world_snapshot, Actor, Blackboard, Bot,
    ControllerMemory, DamageDealt, Facing, FieldOfView, Health, Obstacle, ObstacleSet,
    PatrolRoute, PerceptionEvent, Player, PlayerVisibility, Stimulus, Weapon, WorldPosition,
};

const TICKS: u32 = 600;

fn run_scenario(seed: u64) -> (Vec<u8>, String) {
    let mut app = create_headless_app(seed);

    app.insert_resource(ObstacleSet::new(vec![
        Obstacle::new(Vec3::new(1500.0, 0.0, 150.0), Vec3::new(150.0, 150.0, 150.0)),
        Obstacle::new(Vec3::new(800.0, -900.0, 150.0), Vec3::new(100.0, 100.0, 150.0)),
    ]));

    let player = app
        .world_mut()
        .spawn((
            Actor { faction_id: 0 },
            Player,
            Health::new(100),
            WorldPosition::new(Vec3::ZERO),
            Facing::new(Vec3::X),
            FieldOfView::default(),
        ))
        .id();

    let mut bots = Vec::new();
    for i in 0..2 {
        let y = -800.0 + i as f32 * 1600.0;
        bots.push(
            app.world_mut()
                .spawn((
                    Actor { faction_id: 1 },
                    Bot,
                    Health::new(100),
                    WorldPosition::new(Vec3::new(2500.0, y, 0.0)),
                    Facing::new(-Vec3::X),
                    FieldOfView::default(),
                    Weapon::default(),
                    Blackboard::default(),
                    ControllerMemory::default(),
                    PatrolRoute::new(vec![
                        Vec3::new(2500.0, y, 0.0),
                        Vec3::new(3000.0, -y, 0.0),
                    ]),
                ))
                .id(),
        );
    }

    for tick in 0..TICKS {
        match tick {
            50 => {
                app.world_mut().send_event(PerceptionEvent {
                    observer: bots[0],
                    target: player,
                    stimulus: Stimulus::Sight,
                    gained: true,
                });
            }
            120 => {
                app.world_mut().send_event(DamageDealt {
                    attacker: Some(player),
                    target: bots[0],
                    damage: 40,
                });
            }
            200 => {
                app.world_mut().send_event(PerceptionEvent {
                    observer: bots[0],
                    target: player,
                    stimulus: Stimulus::Sight,
                    gained: false,
                });
            }
            320 => {
                app.world_mut().send_event(PerceptionEvent {
                    observer: bots[1],
                    target: player,
                    stimulus: Stimulus::Hearing,
                    gained: true,
                });
            }
            _ => {}
        }
        step_simulation(&mut app);
    }

    let visibility = format!(
        "{:?}",
        app.world().resource::<PlayerVisibility>().triangles
    );
    let blackboards = world_snapshot::<Blackboard>(app.world_mut());

    (blackboards, visibility)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_scenario(SEED);
    let second = run_scenario(SEED);

    assert_eq!(
        first.0, second.0,
        "одинаковый seed ({}) дал разные blackboard-траектории",
        SEED
    );
    assert_eq!(first.1, second.1, "веер видимости разошёлся между прогонами");
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let snapshots: Vec<_> = (0..3).map(|_| run_scenario(SEED)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_scenario_reaches_expected_states() {
    // Санити поверх детерминизма: сценарий действительно проходит через
    // Fight (бот 0) и Search (после потери), а слух даёт боту 1 last-known
    let (blackboards, _) = run_scenario(7);
    let dump = String::from_utf8_lossy(&blackboards).into_owned();
    assert!(dump.contains("Search"), "бот 0 обязан уйти в Search: {dump}");
}
