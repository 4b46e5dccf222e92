//! Применение урона и события смерти

use bevy::prelude::*;

use crate::components::Health;

/// Событие: урон нанесён (входной канал от хоста или тестов)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    /// Кто нанёс (None — среда/скрипт)
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: u32,
}

/// Событие: entity умер (health упал до 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв, decision-системы его пропускают
#[derive(Component, Debug, Default)]
pub struct Dead;

/// Система: применение DamageDealt к Health + маркировка смертей
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
    mut targets: Query<&mut Health>,
) {
    for event in damage_events.read() {
        let Ok(mut health) = targets.get_mut(event.target) else {
            crate::log_warning(&format!(
                "Combat: DamageDealt по {:?} без Health",
                event.target
            ));
            continue;
        };

        let was_alive = health.is_alive();
        health.take_damage(event.damage);

        if was_alive && !health.is_alive() {
            commands.entity(event.target).insert(Dead);
            died_events.write(EntityDied {
                entity: event.target,
                killer: event.attacker,
            });
            crate::log(&format!(
                "💀 Combat: {:?} killed by {:?}",
                event.target, event.attacker
            ));
        }
    }
}
