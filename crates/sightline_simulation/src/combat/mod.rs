//! Combat bookkeeping — здоровье, оружие, события урона
//!
//! ECS ответственность:
//! - Game state: Health, Weapon (клип, cooldown, перезарядка)
//! - Events: DamageDealt (вход от хоста/тестов), WeaponFired (выход хосту),
//!   EntityDied
//!
//! Хост ответственность:
//! - баллистика, хитбоксы, анимации — сюда приходит только итоговый урон
//!
//! Контроллер читает отсюда clip ratio (флаги перезарядки) и дельту здоровья
//! (окно taking_damage).

use bevy::prelude::*;

pub mod damage;
pub mod weapon;

// Re-export основных типов
pub use damage::{apply_damage, DamageDealt, Dead, EntityDied};
pub use weapon::{bot_fire_control, line_clear_of_allies, tick_weapons, Weapon, WeaponFired};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. apply_damage — применение входящего урона, маркировка смертей
/// 2. tick_weapons — cooldown'ы и завершение перезарядок
/// 3. bot_fire_control — гейт огня ботов (ammo, cooldown, линия чиста от своих)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<WeaponFired>();

        app.add_systems(
            FixedUpdate,
            (apply_damage, tick_weapons, bot_fire_control)
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
