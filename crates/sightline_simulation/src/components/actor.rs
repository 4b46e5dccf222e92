//! Базовые компоненты акторов: Actor, Health, маркеры Player/Bot

use bevy::prelude::*;

/// Актор (бот или игрок) — базовый компонент живых участников матча
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Actor {
    /// Stable ID фракции (игрок и боты в разных)
    pub faction_id: u64,
}

/// Маркер: человеческий игрок (источник visibility-снапшота)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Маркер: управляемый симуляцией бот
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Bot;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}
