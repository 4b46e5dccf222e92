//! PlayerVisibility — общий снапшот видимости кадра
//!
//! Один писатель (refresh_player_visibility), много читателей. Версионирования
//! нет: last write wins, читатели всегда видят последний пересчёт.

use bevy::prelude::*;

use crate::geometry::Triangle;

/// Текущий веер видимости игрока
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerVisibility {
    /// Упорядоченная развёртка: от первого FOV-края к последнему
    pub triangles: Vec<Triangle>,
}

impl PlayerVisibility {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Точка (XY) внутри хотя бы одного треугольника веера
    pub fn contains_2d(&self, point: Vec2) -> bool {
        self.triangles.iter().any(|t| t.contains_2d(point))
    }

    /// Позиция (мировая) на виду у игрока
    pub fn sees(&self, position: Vec3) -> bool {
        self.contains_2d(position.truncate())
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_sees_nothing() {
        let snapshot = PlayerVisibility::default();
        assert!(!snapshot.sees(Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_snapshot_containment() {
        let snapshot = PlayerVisibility::new(vec![Triangle::new(
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 100.0, 0.0),
        )]);
        assert!(snapshot.sees(Vec3::new(20.0, 20.0, 150.0)));
        assert!(!snapshot.sees(Vec3::new(90.0, 90.0, 150.0)));
    }
}
