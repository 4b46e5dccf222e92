//! Геометрические примитивы visibility-подсистемы
//!
//! Треугольники видимости (FOV-веер) + 2D math helpers.
//! Все containment/angle тесты работают в плоскости XY (Z игнорируется):
//! occlusion считается на высоте глаз, мир для зрения «плоский».

use bevy::prelude::*;

/// Порог вырожденности: |cross product| ниже этого — геометрия считается пустой
pub const DEGENERATE_EPS: f32 = 1.0e-6;

/// Треугольник видимости — один клин FOV-веера
///
/// - `far` — дальняя точка текущего луча (скорректированная по occlusion)
/// - `eye` — позиция глаз наблюдателя
/// - `prev` — конечная точка предыдущего луча развёртки
///
/// Веер пересчитывается целиком каждый проход, идентичности у треугольников нет.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub far: Vec3,
    pub eye: Vec3,
    pub prev: Vec3,
}

impl Triangle {
    pub fn new(far: Vec3, eye: Vec3, prev: Vec3) -> Self {
        Self { far, eye, prev }
    }

    /// Точка внутри треугольника (XY-плоскость, граница включительно)
    ///
    /// Барицентрический тест; вырожденный треугольник (коллинеарные вершины)
    /// не содержит ничего.
    pub fn contains_2d(&self, point: Vec2) -> bool {
        let vs1 = (self.eye - self.far).truncate();
        let vs2 = (self.prev - self.far).truncate();

        let denom = vs1.perp_dot(vs2);
        if denom.abs() < DEGENERATE_EPS {
            return false;
        }

        let q = point - self.far.truncate();
        let s = q.perp_dot(vs2) / denom;
        let t = vs1.perp_dot(q) / denom;

        s >= 0.0 && t >= 0.0 && s + t <= 1.0
    }
}

/// Горизонтальная проекция вектора (Z = 0)
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

/// Поворот вектора вокруг вертикальной оси (yaw), градусы
pub fn rotate_yaw_deg(v: Vec3, degrees: f32) -> Vec3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}

/// Угол между векторами в XY-плоскости, градусы в [0, 180]
///
/// Вырожденный операнд (длина ~0) даёт 0 — вызывающий код обязан
/// гейтиться заранее, NaN отсюда не выходит.
pub fn angle_2d_deg(a: Vec3, b: Vec3) -> f32 {
    let a = a.truncate();
    let b = b.truncate();

    let len_product = a.length() * b.length();
    if len_product < DEGENERATE_EPS {
        return 0.0;
    }

    let cos = (a.dot(b) / len_product).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Расстояние между точками в XY-плоскости
pub fn distance_2d(a: Vec3, b: Vec3) -> f32 {
    a.truncate().distance(b.truncate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        )
    }

    #[test]
    fn test_point_inside_triangle() {
        assert!(right_triangle().contains_2d(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_point_outside_triangle() {
        assert!(!right_triangle().contains_2d(Vec2::new(8.0, 8.0)));
    }

    #[test]
    fn test_vertex_is_inside() {
        // Граница включительно: сама вершина принадлежит треугольнику
        let triangle = right_triangle();
        assert!(triangle.contains_2d(Vec2::new(0.0, 0.0)));
        assert!(triangle.contains_2d(Vec2::new(10.0, 0.0)));
        assert!(triangle.contains_2d(Vec2::new(0.0, 10.0)));
    }

    #[test]
    fn test_degenerate_triangle_contains_nothing() {
        let degenerate = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(5.0, 5.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
        );
        assert!(!degenerate.contains_2d(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_containment_ignores_z() {
        let mut triangle = right_triangle();
        triangle.far.z = 150.0;
        triangle.eye.z = 150.0;
        triangle.prev.z = 150.0;
        assert!(triangle.contains_2d(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_rotate_yaw() {
        let rotated = rotate_yaw_deg(Vec3::X, 90.0);
        assert!((rotated - Vec3::Y).length() < 1.0e-5);

        let back = rotate_yaw_deg(rotated, -90.0);
        assert!((back - Vec3::X).length() < 1.0e-5);
    }

    #[test]
    fn test_angle_2d() {
        assert!((angle_2d_deg(Vec3::X, Vec3::Y) - 90.0).abs() < 1.0e-4);
        assert!(angle_2d_deg(Vec3::X, Vec3::X).abs() < 1.0e-4);
        // Z не влияет на угол
        let tilted = Vec3::new(1.0, 0.0, 25.0);
        assert!(angle_2d_deg(tilted, Vec3::X).abs() < 1.0e-4);
        // Вырожденный операнд не даёт NaN
        assert_eq!(angle_2d_deg(Vec3::ZERO, Vec3::X), 0.0);
    }
}
