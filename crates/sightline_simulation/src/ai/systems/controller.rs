//! Per-tick обновления контроллера: видимость, автомат состояний,
//! здоровье, оружие
//!
//! Порядок в кадре повторяет пайплайн «своё → про игрока → про среду»:
//! сначала выясняем, видим ли мы игрока (и не ушёл ли он), потом переключаем
//! состояние, потом служебные флаги.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{Blackboard, BotState, ControllerMemory};
use crate::combat::{Dead, Weapon};
use crate::components::{Bot, Facing, FieldOfView, Health, Player, WorldPosition};
use crate::config::TacticalConfig;
use crate::geometry::{angle_2d_deg, distance_2d};
use crate::vision::PlayerVisibility;
use crate::world::ObstacleSet;
use crate::DeterministicRng;

/// Система: вижу ли я игрока (+ повторный захват после потери)
///
/// Игрок известен — FOV-гейт от моего forward плюс чистая линия глаза-глаза.
/// Игрок неизвестен, а я в Fight — проверяем last-known: линия туда чиста,
/// но игрока-то там нет ⇒ он ушёл (player_lost), пора переходить в Search.
pub fn update_player_visibility(
    config: Res<TacticalConfig>,
    obstacles: Res<ObstacleSet>,
    mut bots: Query<
        (&WorldPosition, &Facing, &FieldOfView, &mut Blackboard),
        (With<Bot>, Without<Dead>),
    >,
    players: Query<&WorldPosition, With<Player>>,
) {
    for (position, facing, fov, mut blackboard) in bots.iter_mut() {
        if let Some(player) = blackboard.player {
            let Ok(player_position) = players.get(player) else {
                blackboard.player_is_visible = false;
                continue;
            };

            let in_fov = angle_2d_deg(
                facing.forward,
                player_position.position - position.position,
            ) <= fov.angle_deg;

            let my_eye = position.eye_point(config.eye_height);
            let player_eye = player_position.eye_point(config.eye_height);

            blackboard.player_is_visible = in_fov && obstacles.line_is_clear(my_eye, player_eye);
        } else {
            blackboard.player_is_visible = false;

            if blackboard.state == BotState::Fight {
                let my_eye = position.eye_point(config.eye_height);
                let last_known_eye = Vec3::new(
                    blackboard.player_location.x,
                    blackboard.player_location.y,
                    config.eye_height,
                );
                blackboard.player_lost = obstacles.line_is_clear(my_eye, last_known_eye);
            }
        }
    }
}

/// Система: автомат состояний Idle/Patrol/Search/Fight
///
/// Приоритеты:
/// 1. игрок известен → Fight, если жив, иначе Idle;
/// 2. игрока нет, но видели раньше → Search (только из Patrol или из Fight
///    с подтверждённой потерей);
/// 3. не видели ни разу → Patrol.
pub fn update_bot_state(
    mut bots: Query<(Entity, &mut Blackboard, &ControllerMemory), (With<Bot>, Without<Dead>)>,
    healths: Query<&Health>,
) {
    for (entity, mut blackboard, memory) in bots.iter_mut() {
        let new_state = if let Some(player) = blackboard.player {
            let player_alive = healths.get(player).map(|h| h.is_alive()).unwrap_or(false);
            if player_alive {
                BotState::Fight
            } else {
                BotState::Idle
            }
        } else if !memory.never_saw_player {
            match blackboard.state {
                BotState::Patrol => BotState::Search,
                BotState::Fight if blackboard.player_lost => BotState::Search,
                current => current,
            }
        } else {
            BotState::Patrol
        };

        if blackboard.state != new_state {
            crate::log(&format!(
                "AI: {:?} {:?} → {:?}",
                entity, blackboard.state, new_state
            ));
            blackboard.state = new_state;
        }
    }
}

/// Система: виден ли я игроку
///
/// FOV-гейт от forward игрока плюс попадание моей позиции в веер видимости
/// кадра. Игрок неизвестен — считаем, что не видим (прогноз экспозиции
/// отдельная забота cover-проверок).
pub fn update_self_exposure(
    config: Res<TacticalConfig>,
    snapshot: Res<PlayerVisibility>,
    mut bots: Query<(&WorldPosition, &mut Blackboard), (With<Bot>, Without<Dead>)>,
) {
    for (position, mut blackboard) in bots.iter_mut() {
        if blackboard.player.is_some() {
            let to_me = position.position - blackboard.player_location;
            let in_fov = angle_2d_deg(blackboard.player_forward, to_me) <= config.fov_angle_deg;
            blackboard.i_am_visible = in_fov && snapshot.sees(position.position);
        } else {
            blackboard.i_am_visible = false;
        }
    }
}

/// Система: близко ли игрок (по last-known)
pub fn update_player_is_close(
    config: Res<TacticalConfig>,
    mut bots: Query<(&WorldPosition, &mut Blackboard), (With<Bot>, Without<Dead>)>,
) {
    for (position, mut blackboard) in bots.iter_mut() {
        blackboard.player_is_close =
            distance_2d(position.position, blackboard.player_location)
                < config.min_player_distance;
    }
}

/// Система: окно «меня обстреливают»
///
/// Резкая потеря HP за тик поднимает флаг; держится regen_wait плюс случайная
/// добавка (ролл один раз на окно), потом сбрасывается.
pub fn update_health_situation(
    time: Res<Time<Fixed>>,
    config: Res<TacticalConfig>,
    mut rng: ResMut<DeterministicRng>,
    mut bots: Query<(&Health, &mut Blackboard, &mut ControllerMemory), (With<Bot>, Without<Dead>)>,
) {
    let delta = time.delta_secs();

    for (health, mut blackboard, mut memory) in bots.iter_mut() {
        if blackboard.taking_damage && memory.health_timer >= memory.damage_hold {
            memory.health_timer = 0.0;
            blackboard.taking_damage = false;
        } else if blackboard.taking_damage {
            memory.health_timer += delta;
        } else if memory.health_last_value != 0 {
            let lost = memory.health_last_value.abs_diff(health.current);
            if lost > config.damage_threshold {
                blackboard.taking_damage = true;
                memory.health_timer = 0.0;
                memory.damage_hold =
                    config.regen_wait + rng.rng.gen_range(0.0..=config.regen_wait_jitter);
            }
        }
        memory.health_last_value = health.current;
    }
}

/// Система: флаги перезарядки по clip ratio
pub fn update_weapon_flags(
    config: Res<TacticalConfig>,
    mut bots: Query<(&Weapon, &mut Blackboard), (With<Bot>, Without<Dead>)>,
) {
    for (weapon, mut blackboard) in bots.iter_mut() {
        let ratio = weapon.ammo_ratio();
        blackboard.need_reload_now = ratio < config.reload_now_ratio;
        blackboard.need_reload_soon = ratio < config.reload_soon_ratio;
    }
}

/// Система: спуск и перезарядка
///
/// Спуск держим в Fight при видимом игроке; пустеющий клип уводит в
/// перезарядку (она сама снимает огонь — can_fire это учитывает).
pub fn update_fire_trigger(
    mut bots: Query<(&Blackboard, &mut Weapon), (With<Bot>, Without<Dead>)>,
) {
    for (blackboard, mut weapon) in bots.iter_mut() {
        weapon.trigger_held =
            blackboard.state == BotState::Fight && blackboard.player_is_visible;

        if blackboard.need_reload_now {
            weapon.start_reload();
        }
    }
}
