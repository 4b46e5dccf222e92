//! Приватная память контроллера + патрульный маршрут
//!
//! То, что в blackboard не публикуется: служебные таймеры, индексы и флаг
//! «игрока не видели ни разу». Behavior tree этого не читает.

use bevy::prelude::*;

/// Служебная память контроллера бота
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ControllerMemory {
    /// Игрок не был воспринят ни разу за матч
    pub never_saw_player: bool,
    /// Текущая позиция в патрульном маршруте
    pub patrol_index: usize,
    /// Last-known, на котором посеяна текущая prediction-карта
    pub prediction_seed: Option<Vec3>,
    /// HP на прошлом тике (детекция резкой потери)
    pub health_last_value: u32,
    /// Сколько держится флаг taking_damage
    pub health_timer: f32,
    /// Длительность текущего окна taking_damage (база + случайная добавка)
    pub damage_hold: f32,
    /// Таймер осматривания в Search
    pub lookaround_timer: f32,
    /// В какую сторону крутим голову следующим осмотром
    pub lookaround_right: bool,
}

impl Default for ControllerMemory {
    fn default() -> Self {
        Self {
            never_saw_player: true,
            patrol_index: 0,
            prediction_seed: None,
            health_last_value: 0,
            health_timer: 0.0,
            damage_hold: 0.0,
            lookaround_timer: 0.0,
            lookaround_right: false,
        }
    }
}

/// Патрульный маршрут (упорядоченные точки, обход по кругу)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    pub points: Vec<Vec3>,
}

impl PatrolRoute {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }
}
