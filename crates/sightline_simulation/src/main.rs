//! Headless прогон SIGHTLINE
//!
//! Поднимает арену-фикстуру (игрок, два бота, пара cover-боксов), гоняет
//! симуляцию детерминированными тиками и печатает смену состояний ботов.

use bevy::prelude::*;
use sightline_simulation::{
    create_headless_app, step_simulation, Actor, Blackboard, Bot, ControllerMemory, Facing,
    FieldOfView, Health, Obstacle, ObstacleSet, PatrolRoute, PerceptionEvent, Player, Stimulus,
    Weapon, WorldPosition,
};

fn main() {
    let seed = 42;
    println!("Starting SIGHTLINE headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    app.insert_resource(ObstacleSet::new(vec![
        Obstacle::new(Vec3::new(1500.0, 0.0, 150.0), Vec3::new(150.0, 150.0, 150.0)),
        Obstacle::new(Vec3::new(800.0, 900.0, 150.0), Vec3::new(100.0, 100.0, 150.0)),
    ]));

    let player = app
        .world_mut()
        .spawn((
            Actor { faction_id: 0 },
            Player,
            Health::new(100),
            WorldPosition::new(Vec3::new(0.0, 0.0, 0.0)),
            Facing::new(Vec3::X),
            FieldOfView::default(),
        ))
        .id();

    let mut bots = Vec::new();
    for i in 0..2 {
        let y = -1000.0 + i as f32 * 2000.0;
        let bot = app
            .world_mut()
            .spawn((
                Actor { faction_id: 1 },
                Bot,
                Health::new(100),
                WorldPosition::new(Vec3::new(3000.0, y, 0.0)),
                Facing::new(-Vec3::X),
                FieldOfView::default(),
                Weapon::default(),
                Blackboard::default(),
                ControllerMemory::default(),
                PatrolRoute::new(vec![
                    Vec3::new(3000.0, y, 0.0),
                    Vec3::new(3500.0, y + 500.0, 0.0),
                ]),
            ))
            .id();
        bots.push(bot);
    }

    // Первый бот замечает игрока на 120-м тике, теряет на 300-м
    for tick in 0..1000u32 {
        if tick == 120 {
            app.world_mut().send_event(PerceptionEvent {
                observer: bots[0],
                target: player,
                stimulus: Stimulus::Sight,
                gained: true,
            });
        }
        if tick == 300 {
            app.world_mut().send_event(PerceptionEvent {
                observer: bots[0],
                target: player,
                stimulus: Stimulus::Sight,
                gained: false,
            });
        }

        step_simulation(&mut app);

        if tick % 100 == 0 {
            let mut states = Vec::new();
            for &bot in &bots {
                if let Some(blackboard) = app.world().get::<Blackboard>(bot) {
                    states.push(format!("{:?}", blackboard.state));
                }
            }
            println!("Tick {}: bots = {:?}", tick, states);
        }
    }

    println!("Simulation complete!");
}
