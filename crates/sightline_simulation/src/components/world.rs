//! Позиционирование и взгляд: WorldPosition, Facing, FieldOfView
//!
//! Симуляция authoritative для позиций: здесь нет внешнего владельца
//! transform'ов, WorldPosition — единственный source of truth.

use bevy::prelude::*;

/// Позиция актора в мировых координатах
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct WorldPosition {
    pub position: Vec3,
}

impl WorldPosition {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Позиция глаз: XY актора на абсолютной высоте глаз (арена плоская)
    pub fn eye_point(&self, eye_height: f32) -> Vec3 {
        Vec3::new(self.position.x, self.position.y, eye_height)
    }
}

/// Направление взгляда (горизонтальный unit-вектор)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub forward: Vec3,
}

impl Default for Facing {
    fn default() -> Self {
        Self { forward: Vec3::X }
    }
}

impl Facing {
    pub fn new(forward: Vec3) -> Self {
        Self {
            forward: crate::geometry::flatten(forward).normalize_or_zero(),
        }
    }

    /// Повернуть взгляд на yaw-угол (градусы)
    pub fn yaw_by(&mut self, degrees: f32) {
        self.forward = crate::geometry::rotate_yaw_deg(self.forward, degrees);
    }

    /// Смотреть из from в сторону to (XY)
    pub fn look_at(&mut self, from: Vec3, to: Vec3) {
        let dir = crate::geometry::flatten(to - from).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.forward = dir;
        }
    }
}

/// Поле зрения наблюдателя
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FieldOfView {
    /// Половина угла обзора (градусы от forward в каждую сторону)
    pub angle_deg: f32,
    /// Дальность зрения
    pub distance: f32,
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self {
            angle_deg: 50.0,
            distance: 5500.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_point_projects_to_eye_height() {
        let pos = WorldPosition::new(Vec3::new(100.0, -40.0, 88.0));
        assert_eq!(pos.eye_point(150.0), Vec3::new(100.0, -40.0, 150.0));
    }

    #[test]
    fn test_facing_normalizes() {
        let facing = Facing::new(Vec3::new(10.0, 0.0, 3.0));
        assert!((facing.forward - Vec3::X).length() < 1.0e-5);
    }

    #[test]
    fn test_look_at_ignores_degenerate_target() {
        let mut facing = Facing::new(Vec3::Y);
        let spot = Vec3::new(5.0, 5.0, 0.0);
        facing.look_at(spot, spot);
        assert_eq!(facing.forward, Vec3::Y);
    }
}
