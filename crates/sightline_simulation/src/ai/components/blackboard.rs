//! Blackboard — тактические ключи бота
//!
//! Поверхность обмена с внешним behavior-tree слоем: контроллер пишет сюда
//! каждый тик, задачи дерева и environment-query тесты читают. Никакой
//! валидации сверх null-гардов — это именно key-value стейт.

use bevy::prelude::*;

/// Состояние decision-автомата бота
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum BotState {
    /// Нет мнения об игроке и узнавать нечего (игрок известен, но мёртв,
    /// либо матч только начался)
    #[default]
    Idle,
    /// Обход патрульных точек по кругу
    Patrol,
    /// Игрока видели, но потеряли — идём по прогнозу
    Search,
    /// Игрок известен, жив и достижим
    Fight,
}

/// Тактический стейт одного бота
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Blackboard {
    pub state: BotState,

    /// Референс игрока; Some — «игрок известен прямо сейчас»
    pub player: Option<Entity>,
    /// Last-known позиция игрока (обновляется зрением и слухом)
    pub player_location: Vec3,
    /// Last-known forward игрока
    pub player_forward: Vec3,

    /// Куда идти патрулём
    pub next_patrol_location: Vec3,
    /// Куда идти искать
    pub next_search_location: Vec3,
    /// Выбранное укрытие
    pub next_cover_location: Vec3,
    /// Выбранная атакующая позиция
    pub next_attack_location: Vec3,

    /// Я вижу игрока
    pub player_is_visible: bool,
    /// Игрок видит меня
    pub i_am_visible: bool,
    /// Игрок ушёл из-под повторного захвата (линия до last-known чиста,
    /// а игрока там нет)
    pub player_lost: bool,
    /// Игрок ближе минимальной дистанции
    pub player_is_close: bool,

    /// Меня обстреливают (окно после резкой потери HP)
    pub taking_damage: bool,
    /// Клип почти пуст — перезаряжаться немедленно
    pub need_reload_now: bool,
    /// Клип на исходе — перезарядиться при случае
    pub need_reload_soon: bool,

    /// Текущая позиция — безопасное укрытие
    pub current_cover_is_safe: bool,
    /// Выбранное укрытие безопасно
    pub next_cover_is_safe: bool,
    /// Текущая позиция годится для атаки
    pub current_attack_is_good: bool,
    /// Выбранная атакующая позиция годится
    pub next_attack_is_good: bool,
}

impl Default for Blackboard {
    fn default() -> Self {
        Self {
            state: BotState::Idle,
            player: None,
            player_location: Vec3::ZERO,
            player_forward: Vec3::X,
            next_patrol_location: Vec3::ZERO,
            next_search_location: Vec3::ZERO,
            next_cover_location: Vec3::ZERO,
            next_attack_location: Vec3::ZERO,
            player_is_visible: false,
            i_am_visible: false,
            player_lost: false,
            player_is_close: false,
            taking_damage: false,
            need_reload_now: false,
            need_reload_soon: false,
            current_cover_is_safe: false,
            next_cover_is_safe: false,
            current_attack_is_good: false,
            next_attack_is_good: false,
        }
    }
}

impl Blackboard {
    /// Игрок известен прямо сейчас
    pub fn player_known(&self) -> bool {
        self.player.is_some()
    }
}
