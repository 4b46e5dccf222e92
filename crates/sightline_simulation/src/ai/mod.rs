//! AI decision-making module
//!
//! Контроллер бота как набор chained-систем поверх blackboard'а:
//! perception-события держат «игрок известен», per-tick апдейты считают
//! видимость в обе стороны, автомат Idle/Patrol/Search/Fight переключает
//! режим, тактические проверки оценивают укрытия и атакующие позиции,
//! скоринг отдаёт оценки внешнему query-слою.
//!
//! Порядок выполнения:
//! 1. (Perception) process_perception_events → update_player_pose
//! 2. (Decision, после vision/influence) видимость → автомат → здоровье/
//!    оружие → экспозиция → патруль/поиск → укрытия/атака → спуск

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod scoring;
pub mod systems;

// Re-export основных типов
pub use components::{
    Blackboard, BotState, ControllerMemory, PatrolRoute, SharedTacticalPositions,
};
pub use events::{PerceptionEvent, Stimulus};
pub use systems::*;

use crate::SimulationSet;

/// AI Plugin
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PerceptionEvent>()
            .init_resource::<SharedTacticalPositions>();

        app.add_systems(
            FixedUpdate,
            (process_perception_events, update_player_pose)
                .chain()
                .in_set(SimulationSet::Perception),
        );

        app.add_systems(
            FixedUpdate,
            (
                update_player_visibility,
                update_bot_state,
                update_health_situation,
                update_weapon_flags,
                update_self_exposure,
                update_player_is_close,
                update_patrol_destination,
                choose_search_destination,
                look_around_while_searching,
                update_tactical_cover,
                update_tactical_attack,
                choose_attack_destination,
                update_fire_trigger,
                forget_dead_bots,
            )
                .chain()
                .in_set(SimulationSet::Decision),
        );
    }
}
