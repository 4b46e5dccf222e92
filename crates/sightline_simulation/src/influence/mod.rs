//! Influence Map — prediction-слой «где может быть игрок»
//!
//! Пока игрок в прямой видимости, прогноз не нужен — ground truth лучше любой
//! диффузии. Эпизод прогноза начинается в момент потери: карта сеется 255 в
//! last-known позиции и дальше каждые update_frequency секунд растекается по
//! walkable-клеткам, а всё, что боты видят прямо сейчас, продавливается в
//! сентинел. Эпизод заканчивается (карта снимается с entity), как только
//! игрок снова известен.
//!
//! Порядок в кадре: после пересчёта visibility, до decision-систем.

use bevy::prelude::*;

pub mod map;

// Tests (separate file with _tests suffix)
#[cfg(test)]
mod map_tests;

pub use map::{InfluenceMap, InfluenceTile, VISIBILITY_SENTINEL};

use crate::ai::{Blackboard, ControllerMemory};
use crate::combat::Dead;
use crate::components::{Bot, Facing, FieldOfView, WorldPosition};
use crate::config::{InfluenceConfig, TacticalConfig};
use crate::vision::calculate_visibility;
use crate::world::{ObstacleSet, WorldBounds};
use crate::SimulationSet;

/// Prediction-карта эпизода «игрок неизвестен» (компонент на боте)
#[derive(Component, Debug)]
pub struct PredictionMap {
    pub map: InfluenceMap,
    /// Решётка изменилась с последнего выбора поисковой точки
    /// (создание эпизода или прошедший проход propagate)
    pub dirty: bool,
}

/// Influence Plugin
pub struct InfluencePlugin;

impl Plugin for InfluencePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            update_prediction_maps.in_set(SimulationSet::Influence),
        );
    }
}

/// Система: lifecycle и тик prediction-карт
///
/// - игрок известен → прогноз снимается (ground truth его вытесняет);
/// - игрок неизвестен, появился новый last-known → карта пересоздаётся и
///   сеется seed_influence в last-known клетке;
/// - карта есть → боту скармливается его собственный веер видимости и
///   решётка тикается (propagate не чаще update_frequency).
pub fn update_prediction_maps(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    influence_config: Res<InfluenceConfig>,
    tactical: Res<TacticalConfig>,
    bounds: Res<WorldBounds>,
    obstacles: Res<ObstacleSet>,
    mut bots: Query<
        (
            Entity,
            &WorldPosition,
            &Facing,
            &FieldOfView,
            &Blackboard,
            &mut ControllerMemory,
            Option<&mut PredictionMap>,
        ),
        (With<Bot>, Without<Dead>),
    >,
) {
    let delta = time.delta_secs();

    for (entity, position, facing, fov, blackboard, mut memory, prediction) in bots.iter_mut() {
        if blackboard.player.is_some() {
            // Игрок известен — прогноз больше не нужен
            if prediction.is_some() {
                commands.entity(entity).remove::<PredictionMap>();
                memory.prediction_seed = None;
                crate::log(&format!(
                    "Influence: {:?} player reacquired, prediction map dropped",
                    entity
                ));
            }
            continue;
        }

        if memory.never_saw_player {
            // Ни разу не видели — сеять нечего
            continue;
        }

        let last_known = blackboard.player_location;
        if memory.prediction_seed != Some(last_known) {
            // Свежая информация о позиции — пересобираем эпизод
            let mut map = InfluenceMap::new(*bounds, &influence_config, |p| {
                obstacles.is_walkable(p)
            });
            if !map.set_influence_at_world(last_known.truncate(), influence_config.seed_influence)
            {
                crate::log_warning(&format!(
                    "Influence: {:?} seed {:?} вне решётки или non-walkable",
                    entity, last_known
                ));
            }
            memory.prediction_seed = Some(last_known);
            commands
                .entity(entity)
                .insert(PredictionMap { map, dirty: true });
            continue;
        }

        if let Some(mut prediction) = prediction {
            let eye = position.eye_point(tactical.eye_height);
            let fan = calculate_visibility(
                &obstacles,
                eye,
                facing.forward,
                fov.angle_deg,
                fov.distance,
                tactical.ray_offset,
            );
            prediction.map.set_bot_visibility(entity, fan);
            if prediction.map.tick(delta) {
                prediction.dirty = true;
            }
        }
    }
}
