//! AI Events — стимулы восприятия от внешнего perception-слоя
//!
//! Хост (sight/hearing сенсоры движка) шлёт по событию на каждую смену
//! стимула: цель вошла в восприятие наблюдателя или вышла из него.
//! Контроллер по этим событиям держит «игрок известен» состояние.

use bevy::prelude::*;

/// Канал стимула
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stimulus {
    /// Прямая видимость: даёт и забирает референс игрока
    Sight,
    /// Слух: обновляет только last-known позицию
    Hearing,
}

/// Событие восприятия: у observer сменился стимул по target
#[derive(Event, Debug, Clone)]
pub struct PerceptionEvent {
    /// Entity наблюдателя (бот)
    pub observer: Entity,
    /// Entity цели (интересен только игрок)
    pub target: Entity,
    pub stimulus: Stimulus,
    /// true — стимул появился, false — пропал
    pub gained: bool,
}
