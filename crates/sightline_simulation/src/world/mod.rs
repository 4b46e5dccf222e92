//! Мир глазами AI: cover-препятствия, границы арены, лучи на высоте глаз
//!
//! Единственный «физический» запрос, который нужен strategic-слою — луч в
//! плоскости высоты глаз против набора cover-боксов. Набор препятствий —
//! один source of truth для visibility-развёртки, cover-проверок и
//! walkability influence-грида. Рендер и полноценная физика — внешний слой.

use bevy::prelude::*;

/// Tangent-порог slab-теста: интервал пересечения короче этого — луч лишь
/// касается силуэта бокса и проходит мимо (углы не должны сами себя заслонять)
const GRAZE_EPS: f32 = 1.0e-4;

/// Cover-блок (axis-aligned box) в мировых координатах
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec3,
    pub half_extent: Vec3,
}

impl Obstacle {
    pub fn new(center: Vec3, half_extent: Vec3) -> Self {
        Self { center, half_extent }
    }

    /// Верхняя грань (мировой Z)
    pub fn top(&self) -> f32 {
        self.center.z + self.half_extent.z
    }

    /// Перекрывает ли бокс горизонтальную плоскость на высоте z
    pub fn blocks_at(&self, z: f32) -> bool {
        self.center.z - self.half_extent.z <= z && z <= self.top()
    }

    /// Четыре верхних угла footprint'а, спроецированные на высоту z
    pub fn upper_corners_at(&self, z: f32) -> [Vec3; 4] {
        let (cx, cy) = (self.center.x, self.center.y);
        let (ex, ey) = (self.half_extent.x, self.half_extent.y);
        [
            Vec3::new(cx + ex, cy + ey, z),
            Vec3::new(cx - ex, cy + ey, z),
            Vec3::new(cx + ex, cy - ey, z),
            Vec3::new(cx - ex, cy - ey, z),
        ]
    }

    /// Точка внутри footprint'а (XY, граница включительно)
    pub fn footprint_contains(&self, p: Vec2) -> bool {
        (p.x - self.center.x).abs() <= self.half_extent.x
            && (p.y - self.center.y).abs() <= self.half_extent.y
    }
}

/// Прямоугольник мира, который накрывает influence-грид
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min: Vec2::new(-5000.0, -5000.0),
            max: Vec2::new(5000.0, 5000.0),
        }
    }
}

impl WorldBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Все cover-препятствия сцены
///
/// Заполняется при сборке арены (хостом или тестовой фикстурой) и дальше
/// только читается — боксы статичны в пределах матча.
#[derive(Resource, Debug, Clone, Default)]
pub struct ObstacleSet {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// Ближайшее пересечение отрезка from→to с препятствием на высоте from.z
    ///
    /// Возвращает точку входа в бокс; None — путь чист. Касание силуэта
    /// (tangent по углу/ребру) пересечением не считается.
    pub fn raycast_2d(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        let origin = from.truncate();
        let dir = to.truncate() - origin;

        let mut best_t: Option<f32> = None;
        for obstacle in &self.obstacles {
            if !obstacle.blocks_at(from.z) {
                continue;
            }
            if let Some(t) = segment_aabb_entry_2d(origin, dir, obstacle) {
                if best_t.map_or(true, |best| t < best) {
                    best_t = Some(t);
                }
            }
        }

        best_t.map(|t| {
            let hit = origin + dir * t;
            Vec3::new(hit.x, hit.y, from.z)
        })
    }

    /// Отрезок между точками не заслонён ни одним боксом
    pub fn line_is_clear(&self, from: Vec3, to: Vec3) -> bool {
        self.raycast_2d(from, to).is_none()
    }

    /// Свободна ли точка от footprint'ов (walkability для influence-грида)
    pub fn is_walkable(&self, p: Vec2) -> bool {
        !self.obstacles.iter().any(|o| o.footprint_contains(p))
    }
}

/// Slab-тест отрезка против footprint'а бокса. Возвращает параметр t входа
/// в [0, 1]; None — мимо, тангенциальное касание тоже мимо.
fn segment_aabb_entry_2d(origin: Vec2, dir: Vec2, obstacle: &Obstacle) -> Option<f32> {
    let lo = Vec2::new(
        obstacle.center.x - obstacle.half_extent.x,
        obstacle.center.y - obstacle.half_extent.y,
    );
    let hi = Vec2::new(
        obstacle.center.x + obstacle.half_extent.x,
        obstacle.center.y + obstacle.half_extent.y,
    );

    let mut t_min = 0.0f32;
    let mut t_max = 1.0f32;

    for axis in 0..2 {
        let (o, d, lo, hi) = match axis {
            0 => (origin.x, dir.x, lo.x, hi.x),
            _ => (origin.y, dir.y, lo.y, hi.y),
        };

        if d.abs() < 1.0e-9 {
            // Параллельно слою: либо внутри полосы, либо мимо целиком
            if o < lo || o > hi {
                return None;
            }
        } else {
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
    }

    // Касание угла/ребра — не occlusion
    if t_max - t_min < GRAZE_EPS {
        return None;
    }

    Some(t_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_box() -> ObstacleSet {
        // Бокс 200x200, верх на 300 — выше любой высоты глаз в тестах
        ObstacleSet::new(vec![Obstacle::new(
            Vec3::new(500.0, 0.0, 150.0),
            Vec3::new(100.0, 100.0, 150.0),
        )])
    }

    #[test]
    fn test_raycast_hits_front_face() {
        let world = single_box();
        let hit = world
            .raycast_2d(Vec3::new(0.0, 0.0, 150.0), Vec3::new(1000.0, 0.0, 150.0))
            .expect("ray through the box must hit");
        assert!((hit.x - 400.0).abs() < 1.0e-3);
        assert!(hit.y.abs() < 1.0e-3);
    }

    #[test]
    fn test_raycast_misses_aside() {
        let world = single_box();
        assert!(world.line_is_clear(
            Vec3::new(0.0, 300.0, 150.0),
            Vec3::new(1000.0, 300.0, 150.0)
        ));
    }

    #[test]
    fn test_raycast_ignores_short_obstacles() {
        // Луч на высоте глаз проходит над низким боксом
        let low = ObstacleSet::new(vec![Obstacle::new(
            Vec3::new(500.0, 0.0, 50.0),
            Vec3::new(100.0, 100.0, 50.0),
        )]);
        assert!(low.line_is_clear(
            Vec3::new(0.0, 0.0, 150.0),
            Vec3::new(1000.0, 0.0, 150.0)
        ));
    }

    #[test]
    fn test_raycast_corner_graze_is_clear() {
        // Луч точно через угол (400, 100) — силуэт, не occlusion
        let world = single_box();
        assert!(world.line_is_clear(
            Vec3::new(0.0, 0.0, 150.0),
            Vec3::new(800.0, 200.0, 150.0)
        ));
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut world = single_box();
        world.obstacles.push(Obstacle::new(
            Vec3::new(200.0, 0.0, 150.0),
            Vec3::new(50.0, 50.0, 150.0),
        ));
        let hit = world
            .raycast_2d(Vec3::new(0.0, 0.0, 150.0), Vec3::new(1000.0, 0.0, 150.0))
            .expect("must hit the nearer box");
        assert!((hit.x - 150.0).abs() < 1.0e-3);
    }

    #[test]
    fn test_walkability_respects_footprints() {
        let world = single_box();
        assert!(world.is_walkable(Vec2::new(0.0, 0.0)));
        assert!(!world.is_walkable(Vec2::new(500.0, 0.0)));
    }
}
