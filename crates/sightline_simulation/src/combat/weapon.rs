//! Оружие бота: клип, cooldown, перезарядка и гейт огня
//!
//! Стрелять можно, когда есть патроны в клипе, cooldown прошёл и линия до
//! цели не перекрыта союзным ботом. Контроллер решает «в кого», здесь
//! решается «можно ли нажимать».

use bevy::prelude::*;

use crate::ai::Blackboard;
use crate::components::{Bot, WorldPosition};
use crate::config::TacticalConfig;

/// Состояние оружия
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub clip_size: u32,
    pub ammo_in_clip: u32,
    /// Интервал между выстрелами (секунды)
    pub attack_cooldown: f32,
    pub cooldown_timer: f32,
    pub reload_duration: f32,
    pub reload_timer: f32,
    pub reloading: bool,
    /// Контроллер держит спуск (желание стрелять, не сам выстрел)
    pub trigger_held: bool,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            clip_size: 30,
            ammo_in_clip: 30,
            attack_cooldown: 0.15,
            cooldown_timer: 0.0,
            reload_duration: 2.0,
            reload_timer: 0.0,
            reloading: false,
            trigger_held: false,
        }
    }
}

impl Weapon {
    /// Доля патронов в клипе, 0.0 при пустом клипе
    pub fn ammo_ratio(&self) -> f32 {
        if self.clip_size == 0 {
            return 0.0;
        }
        self.ammo_in_clip as f32 / self.clip_size as f32
    }

    pub fn can_fire(&self) -> bool {
        !self.reloading && self.ammo_in_clip > 0 && self.cooldown_timer <= 0.0
    }

    /// Начать перезарядку (no-op, если уже идёт или клип полон)
    pub fn start_reload(&mut self) {
        if !self.reloading && self.ammo_in_clip < self.clip_size {
            self.reloading = true;
            self.reload_timer = self.reload_duration;
        }
    }

    /// Потратить патрон; false — выстрел сейчас невозможен
    pub fn consume_round(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.ammo_in_clip -= 1;
        self.cooldown_timer = self.attack_cooldown;
        true
    }

    /// Тик таймеров: cooldown вниз, перезарядка до заполнения клипа
    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
        if self.reloading {
            self.reload_timer -= delta;
            if self.reload_timer <= 0.0 {
                self.ammo_in_clip = self.clip_size;
                self.reloading = false;
                self.reload_timer = 0.0;
            }
        }
    }
}

/// Событие: бот произвёл выстрел (хост рисует трассер и считает попадание)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    /// Куда целился (focal point контроллера)
    pub target_point: Vec3,
}

/// Линия огня чиста от союзных ботов
///
/// Союзник ближе block_radius к отрезку from→to перекрывает выстрел.
pub fn line_clear_of_allies(
    shooter: Entity,
    from: Vec3,
    to: Vec3,
    allies: &[(Entity, Vec3)],
    block_radius: f32,
) -> bool {
    let start = from.truncate();
    let end = to.truncate();
    let segment = end - start;
    let len_sq = segment.length_squared();

    for (ally, position) in allies {
        if *ally == shooter {
            continue;
        }
        let p = position.truncate();
        let t = if len_sq <= f32::EPSILON {
            0.0
        } else {
            ((p - start).dot(segment) / len_sq).clamp(0.0, 1.0)
        };
        let closest = start + segment * t;
        if p.distance(closest) < block_radius {
            return false;
        }
    }

    true
}

/// Система: тик таймеров всех стволов
pub fn tick_weapons(time: Res<Time<Fixed>>, mut weapons: Query<&mut Weapon>) {
    let delta = time.delta_secs();
    for mut weapon in weapons.iter_mut() {
        weapon.tick(delta);
    }
}

/// Система: гейт огня ботов
///
/// Спуск держит контроллер (trigger_held по состоянию Fight); выстрел уходит
/// только если клип не пуст, cooldown прошёл и на линии нет своих.
pub fn bot_fire_control(
    config: Res<TacticalConfig>,
    mut shooters: Query<(Entity, &WorldPosition, &mut Weapon, &Blackboard), With<Bot>>,
    others: Query<(Entity, &WorldPosition), With<Bot>>,
    mut fired: EventWriter<WeaponFired>,
) {
    let bot_positions: Vec<(Entity, Vec3)> = others
        .iter()
        .map(|(entity, position)| (entity, position.position))
        .collect();

    for (entity, position, mut weapon, blackboard) in shooters.iter_mut() {
        if !weapon.trigger_held {
            continue;
        }

        let from = position.eye_point(config.eye_height);
        let target = Vec3::new(
            blackboard.player_location.x,
            blackboard.player_location.y,
            config.eye_height,
        );

        if !line_clear_of_allies(entity, from, target, &bot_positions, config.bot_block_radius) {
            continue;
        }

        if weapon.consume_round() {
            fired.write(WeaponFired {
                shooter: entity,
                target_point: target,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ammo_ratio() {
        let mut weapon = Weapon::default();
        assert_eq!(weapon.ammo_ratio(), 1.0);

        weapon.ammo_in_clip = 3;
        assert!((weapon.ammo_ratio() - 0.1).abs() < 1.0e-6);

        weapon.clip_size = 0;
        assert_eq!(weapon.ammo_ratio(), 0.0);
    }

    #[test]
    fn test_consume_round_and_cooldown() {
        let mut weapon = Weapon::default();
        assert!(weapon.consume_round());
        assert_eq!(weapon.ammo_in_clip, 29);

        // Cooldown блокирует следующий выстрел
        assert!(!weapon.can_fire());
        weapon.tick(0.2);
        assert!(weapon.can_fire());
    }

    #[test]
    fn test_reload_refills_clip() {
        let mut weapon = Weapon::default();
        weapon.ammo_in_clip = 2;
        weapon.start_reload();
        assert!(weapon.reloading);
        assert!(!weapon.can_fire());

        weapon.tick(1.0);
        assert!(weapon.reloading);
        weapon.tick(1.1);
        assert!(!weapon.reloading);
        assert_eq!(weapon.ammo_in_clip, 30);
    }

    #[test]
    fn test_reload_noop_on_full_clip() {
        let mut weapon = Weapon::default();
        weapon.start_reload();
        assert!(!weapon.reloading);
    }

    #[test]
    fn test_line_clear_of_allies() {
        let shooter = Entity::from_raw(1);
        let ally = Entity::from_raw(2);

        let from = Vec3::new(0.0, 0.0, 150.0);
        let to = Vec3::new(1000.0, 0.0, 150.0);

        // Союзник на линии — огонь запрещён
        let blocking = vec![(ally, Vec3::new(500.0, 10.0, 0.0))];
        assert!(!line_clear_of_allies(shooter, from, to, &blocking, 50.0));

        // Союзник в стороне — можно
        let aside = vec![(ally, Vec3::new(500.0, 200.0, 0.0))];
        assert!(line_clear_of_allies(shooter, from, to, &aside, 50.0));

        // Сам стрелок линию не блокирует
        let only_self = vec![(shooter, Vec3::new(0.0, 0.0, 0.0))];
        assert!(line_clear_of_allies(shooter, from, to, &only_self, 50.0));
    }
}
