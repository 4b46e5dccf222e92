//! Патруль, выбор поисковых/атакующих точек, осматривание
//!
//! Патруль — обход приаттаченных точек по кругу. Поиск — argmax по
//! prediction-карте с разносом от чужих выборов. Осматривание — периодический
//! поворот головы, пока ищем: FOV узкий, без вращения боковые сектора
//! никогда не попадут в веер.

use bevy::prelude::*;

use crate::ai::{scoring, Blackboard, BotState, ControllerMemory, PatrolRoute, SharedTacticalPositions};
use crate::combat::{Dead, EntityDied};
use crate::components::{Bot, Facing, WorldPosition};
use crate::config::TacticalConfig;
use crate::geometry::{distance_2d, rotate_yaw_deg};
use crate::influence::PredictionMap;
use crate::world::ObstacleSet;

use super::tactics::position_is_good_attack;

/// Вес разноса при выборе поисковой точки: influence решает, разнос
/// раздёргивает равноценных кандидатов
const SEARCH_SPREAD_WEIGHT: f32 = 0.01;

/// Кольца кандидатов вокруг бота при выборе атакующей позиции
const ATTACK_RING_RADII: [f32; 2] = [300.0, 600.0];
const ATTACK_RING_STEPS: u32 = 8;

/// Записать выбранную атакующую позицию (blackboard + общая карта)
pub fn record_attack_location(
    bot: Entity,
    location: Vec3,
    blackboard: &mut Blackboard,
    memory: &mut ControllerMemory,
    shared: &mut SharedTacticalPositions,
) {
    memory.never_saw_player = false;
    blackboard.next_attack_location = location;
    shared.attack.insert(bot, location);
}

/// Система: очередная патрульная точка (по кругу)
///
/// Точка перевыбирается, когда текущая не задана или достигнута.
pub fn update_patrol_destination(
    config: Res<TacticalConfig>,
    mut bots: Query<
        (&PatrolRoute, &WorldPosition, &mut Blackboard, &mut ControllerMemory),
        (With<Bot>, Without<Dead>),
    >,
) {
    for (route, position, mut blackboard, mut memory) in bots.iter_mut() {
        if blackboard.state != BotState::Patrol || route.points.is_empty() {
            continue;
        }

        let arrived = distance_2d(position.position, blackboard.next_patrol_location)
            < config.patrol_arrival_radius;
        if blackboard.next_patrol_location != Vec3::ZERO && !arrived {
            continue;
        }

        if memory.patrol_index >= route.points.len() {
            memory.patrol_index = 0;
        }
        blackboard.next_patrol_location = route.points[memory.patrol_index];
        memory.patrol_index += 1;
    }
}

/// Система: выбор поисковой точки по prediction-карте
///
/// Кандидаты — все walkable-клетки с положительным influence; скоринг —
/// influence-оценка плюс разнос от точек, уже выбранных другими ботами.
/// Выбор публикуется в общую карту, чтобы остальные разносились от него.
/// Перевыбор — только после изменения решётки (создание эпизода или
/// очередной проход propagate), полный обход клеток каждый тик не нужен.
pub fn choose_search_destination(
    mut shared: ResMut<SharedTacticalPositions>,
    mut bots: Query<
        (Entity, &mut Blackboard, Option<&mut PredictionMap>),
        (With<Bot>, Without<Dead>),
    >,
) {
    for (entity, mut blackboard, prediction) in bots.iter_mut() {
        if blackboard.state != BotState::Search {
            continue;
        }
        let Some(mut prediction) = prediction else {
            continue;
        };
        if !prediction.dirty && blackboard.next_search_location != Vec3::ZERO {
            continue;
        }
        prediction.dirty = false;
        let map = &prediction.map;

        let mut best: Option<(f32, Vec3)> = None;
        for index in 0..map.width() * map.height() {
            let Some(tile) = map.tile(index) else {
                break;
            };
            if !tile.walkable || tile.influence <= 0.0 {
                continue;
            }

            let world = map.grid_to_world(tile.x, tile.y);
            let candidate = Vec3::new(world.x, world.y, 0.0);
            let score = scoring::score_high_influence(map, candidate)
                + SEARCH_SPREAD_WEIGHT
                    * scoring::score_search_spread(&shared.search, entity, candidate);

            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, candidate));
            }
        }

        if let Some((_, location)) = best {
            blackboard.next_search_location = location;
            shared.search.insert(entity, location);
        }
    }
}

/// Система: осматривание в Search
///
/// Каждые lookaround_period секунд поворот на lookaround_angle_deg,
/// стороны чередуются. Вне Search таймер сбрасывается.
pub fn look_around_while_searching(
    time: Res<Time<Fixed>>,
    config: Res<TacticalConfig>,
    mut bots: Query<(&mut Facing, &Blackboard, &mut ControllerMemory), (With<Bot>, Without<Dead>)>,
) {
    let delta = time.delta_secs();

    for (mut facing, blackboard, mut memory) in bots.iter_mut() {
        if blackboard.state != BotState::Search {
            memory.lookaround_timer = 0.0;
            continue;
        }

        memory.lookaround_timer += delta;
        if memory.lookaround_timer >= config.lookaround_period {
            memory.lookaround_timer = 0.0;
            let angle = if memory.lookaround_right {
                -config.lookaround_angle_deg
            } else {
                config.lookaround_angle_deg
            };
            facing.yaw_by(angle);
            memory.lookaround_right = !memory.lookaround_right;
        }
    }
}

/// Система: выбор атакующей позиции в Fight
///
/// Пока текущий выбор годится — не трогаем. Иначе кольца кандидатов вокруг
/// себя, первая позиция с cover-опцией поблизости записывается и публикуется.
pub fn choose_attack_destination(
    config: Res<TacticalConfig>,
    obstacles: Res<ObstacleSet>,
    mut shared: ResMut<SharedTacticalPositions>,
    mut bots: Query<
        (Entity, &WorldPosition, &mut Blackboard, &mut ControllerMemory),
        (With<Bot>, Without<Dead>),
    >,
) {
    for (entity, position, mut blackboard, mut memory) in bots.iter_mut() {
        if blackboard.state != BotState::Fight || !blackboard.player_is_visible {
            continue;
        }
        if blackboard.next_attack_is_good {
            continue;
        }

        let player_location = blackboard.player_location;
        let mut chosen = None;
        'ring: for radius in ATTACK_RING_RADII {
            for step in 0..ATTACK_RING_STEPS {
                let angle = step as f32 * (360.0 / ATTACK_RING_STEPS as f32);
                let candidate = position.position + rotate_yaw_deg(Vec3::X, angle) * radius;
                if position_is_good_attack(&obstacles, candidate, player_location, true, &config) {
                    chosen = Some(candidate);
                    break 'ring;
                }
            }
        }

        if let Some(location) = chosen {
            record_attack_location(entity, location, &mut blackboard, &mut memory, &mut shared);
        }
    }
}

/// Система: зачистка общих карт от погибших ботов
pub fn forget_dead_bots(
    mut died: EventReader<EntityDied>,
    mut shared: ResMut<SharedTacticalPositions>,
) {
    for event in died.read() {
        shared.forget(event.entity);
    }
}
