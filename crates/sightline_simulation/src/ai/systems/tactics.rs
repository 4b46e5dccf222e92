//! Тактические проверки: безопасность укрытий и годность атакующих позиций

use bevy::prelude::*;

use crate::ai::Blackboard;
use crate::combat::Dead;
use crate::components::{Bot, WorldPosition};
use crate::config::TacticalConfig;
use crate::world::ObstacleSet;

/// Позиция — безопасное укрытие от игрока
///
/// Луч на высоте глаз от кандидата к позиции игрока упирается в препятствие
/// (что-то, что не игрок) ⇒ за этим что-то можно прятаться.
pub fn position_is_safe_cover(
    obstacles: &ObstacleSet,
    cover: Vec3,
    player: Vec3,
    eye_height: f32,
) -> bool {
    let cover_eye = Vec3::new(cover.x, cover.y, eye_height);
    let player_eye = Vec3::new(player.x, player.y, eye_height);
    obstacles.raycast_2d(cover_eye, player_eye).is_some()
}

/// Позиция годится для атаки
///
/// Только при видимом прямо сейчас игроке, и только если в квадрате
/// ±cover_search_half_extent вокруг кандидата (шаг cover_search_step)
/// найдётся хоть одна безопасная cover-точка — прокси «есть куда отскочить».
/// Выход по первому попаданию.
pub fn position_is_good_attack(
    obstacles: &ObstacleSet,
    attack: Vec3,
    player: Vec3,
    player_is_visible: bool,
    config: &TacticalConfig,
) -> bool {
    if attack == Vec3::ZERO {
        // Незаполненный слот blackboard'а
        return false;
    }
    if !player_is_visible {
        return false;
    }

    let steps = (config.cover_search_half_extent * 2.0 / config.cover_search_step).max(1.0) as i32;
    for ix in 0..steps {
        let x = attack.x - config.cover_search_half_extent + ix as f32 * config.cover_search_step;
        for iy in 0..steps {
            let y =
                attack.y - config.cover_search_half_extent + iy as f32 * config.cover_search_step;
            let candidate = Vec3::new(x, y, 0.0);
            if position_is_safe_cover(obstacles, candidate, player, config.eye_height) {
                return true;
            }
        }
    }

    false
}

/// Система: оценка укрытий — текущего места и выбранного next
///
/// При известном игроке текущее место не может быть safe, если игрок меня
/// уже видит; дальше обычная трассировка. При неизвестном — оцениваем против
/// last-known.
pub fn update_tactical_cover(
    config: Res<TacticalConfig>,
    obstacles: Res<ObstacleSet>,
    mut bots: Query<(&WorldPosition, &mut Blackboard), (With<Bot>, Without<Dead>)>,
) {
    for (position, mut blackboard) in bots.iter_mut() {
        let player_location = blackboard.player_location;

        let current_safe = if blackboard.player_known() && blackboard.i_am_visible {
            false
        } else {
            position_is_safe_cover(
                &obstacles,
                position.position,
                player_location,
                config.eye_height,
            )
        };

        blackboard.current_cover_is_safe = current_safe;
        blackboard.next_cover_is_safe = position_is_safe_cover(
            &obstacles,
            blackboard.next_cover_location,
            player_location,
            config.eye_height,
        );
    }
}

/// Система: оценка атакующих позиций — текущей и выбранной next
pub fn update_tactical_attack(
    config: Res<TacticalConfig>,
    obstacles: Res<ObstacleSet>,
    mut bots: Query<(&WorldPosition, &mut Blackboard), (With<Bot>, Without<Dead>)>,
) {
    for (position, mut blackboard) in bots.iter_mut() {
        let player_location = blackboard.player_location;
        let player_visible = blackboard.player_is_visible;

        blackboard.current_attack_is_good = position_is_good_attack(
            &obstacles,
            position.position,
            player_location,
            player_visible,
            &config,
        );
        blackboard.next_attack_is_good = position_is_good_attack(
            &obstacles,
            blackboard.next_attack_location,
            player_location,
            player_visible,
            &config,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Obstacle;

    fn arena() -> ObstacleSet {
        // Один бокс между укрытием и игроком
        ObstacleSet::new(vec![Obstacle::new(
            Vec3::new(500.0, 0.0, 150.0),
            Vec3::new(100.0, 100.0, 150.0),
        )])
    }

    fn config() -> TacticalConfig {
        TacticalConfig::default()
    }

    #[test]
    fn test_cover_behind_box_is_safe() {
        let obstacles = arena();
        let player = Vec3::new(1000.0, 0.0, 0.0);

        // За боксом от игрока — safe
        assert!(position_is_safe_cover(
            &obstacles,
            Vec3::new(0.0, 0.0, 0.0),
            player,
            150.0
        ));
        // На открытой линии — нет
        assert!(!position_is_safe_cover(
            &obstacles,
            Vec3::new(1000.0, 800.0, 0.0),
            player,
            150.0
        ));
    }

    #[test]
    fn test_attack_requires_visible_player() {
        let obstacles = arena();
        let player = Vec3::new(1000.0, 0.0, 0.0);
        let spot = Vec3::new(300.0, 300.0, 0.0);

        assert!(!position_is_good_attack(
            &obstacles, spot, player, false, &config()
        ));
        assert!(position_is_good_attack(
            &obstacles, spot, player, true, &config()
        ));
    }

    #[test]
    fn test_attack_requires_cover_option_nearby() {
        // Пустая арена: прятаться негде — позиция для атаки не годится
        let empty = ObstacleSet::default();
        let player = Vec3::new(1000.0, 0.0, 0.0);

        assert!(!position_is_good_attack(
            &empty,
            Vec3::new(300.0, 300.0, 0.0),
            player,
            true,
            &config()
        ));
    }

    #[test]
    fn test_attack_rejects_empty_slot() {
        let obstacles = arena();
        assert!(!position_is_good_attack(
            &obstacles,
            Vec3::ZERO,
            Vec3::new(1000.0, 0.0, 0.0),
            true,
            &config()
        ));
    }
}
