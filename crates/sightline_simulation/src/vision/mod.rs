//! Vision System — visibility-веер игрока и общий снапшот
//!
//! Каждый тик пересчитываем, что именно видит игрок (веер треугольников от
//! позиции глаз), и публикуем результат одним ресурсом `PlayerVisibility`.
//! Потребители — influence-маскирование, navigation cost filter и exposure
//! проверки контроллера — читают один и тот же снапшот кадра.
//!
//! Порядок внутри кадра жёсткий: снапшот пишется ДО influence/decision систем
//! (см. SimulationSet в lib.rs), иначе маскирование и стоимость путей едут на
//! прошлом кадре.

use bevy::prelude::*;

pub mod calculator;
pub mod snapshot;

pub use calculator::{calculate_visibility, FanVertex};
pub use snapshot::PlayerVisibility;

use crate::components::{Facing, FieldOfView, Player, WorldPosition};
use crate::config::TacticalConfig;
use crate::world::ObstacleSet;
use crate::SimulationSet;

/// Vision Plugin
///
/// Единственный писатель `PlayerVisibility` — система пересчёта ниже.
pub struct VisionPlugin;

impl Plugin for VisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerVisibility>().add_systems(
            FixedUpdate,
            refresh_player_visibility.in_set(SimulationSet::Vision),
        );
    }
}

/// Система: пересчёт visibility-веера от текущей позы игрока
///
/// Нет игрока в мире — снапшот пустой (fail soft, потребители трактуют как
/// «ничего не видно»).
pub fn refresh_player_visibility(
    players: Query<(&WorldPosition, &Facing, &FieldOfView), With<Player>>,
    obstacles: Res<ObstacleSet>,
    config: Res<TacticalConfig>,
    mut snapshot: ResMut<PlayerVisibility>,
) {
    let Some((position, facing, fov)) = players.iter().next() else {
        if !snapshot.triangles.is_empty() {
            snapshot.triangles.clear();
        }
        return;
    };

    let eye = position.eye_point(config.eye_height);
    snapshot.triangles = calculate_visibility(
        &obstacles,
        eye,
        facing.forward,
        fov.angle_deg,
        fov.distance,
        config.ray_offset,
    );
}
