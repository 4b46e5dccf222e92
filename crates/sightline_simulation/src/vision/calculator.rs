//! Расчёт visibility-веера: angular sweep по углам препятствий
//!
//! Классический алгоритм 2D visibility polygon, адаптированный под FOV-сектор:
//! кандидаты — верхние углы cover-боксов на высоте глаз плюс две граничные
//! точки сектора; сортируем по углу от первого граничного луча и развёртываем,
//! пуская луч через каждую вершину. Результат — веер треугольников
//! (far, eye, prev), покрывающий ровно незаслонённую часть сектора.
//!
//! Сцена без препятствий даёт один широкий треугольник на весь сектор.

use bevy::prelude::*;

use crate::geometry::{angle_2d_deg, flatten, rotate_yaw_deg, Triangle};
use crate::world::ObstacleSet;

/// Кандидатная вершина развёртки: угол препятствия или край FOV
///
/// Живёт один проход: собрали, отсортировали, развернули, выбросили.
#[derive(Debug, Clone, Copy)]
pub struct FanVertex {
    pub position: Vec3,
    /// Угловой минимум своего бокса (или левый край FOV)
    pub leftmost: bool,
    /// Угловой максимум своего бокса (или правый край FOV)
    pub rightmost: bool,
}

/// Полный пересчёт видимости от одной позы наблюдателя
///
/// `eye` — позиция глаз (Z задаёт плоскость расчёта), `forward` — направление
/// взгляда (Z игнорируется), `view_angle_deg` — половина угла сектора,
/// `ray_offset` — продление луча за вершину против self-occlusion.
///
/// Детерминирован: стабильная сортировка поверх стабильного порядка
/// препятствий, никакого скрытого состояния.
pub fn calculate_visibility(
    obstacles: &ObstacleSet,
    eye: Vec3,
    forward: Vec3,
    view_angle_deg: f32,
    view_distance: f32,
    ray_offset: f32,
) -> Vec<Triangle> {
    let forward = flatten(forward).normalize_or_zero();
    if forward == Vec3::ZERO {
        return Vec::new();
    }

    // Граничные лучи сектора
    let first_boundary = eye + rotate_yaw_deg(forward, -view_angle_deg) * view_distance;
    let last_boundary = eye + rotate_yaw_deg(forward, view_angle_deg) * view_distance;

    let mut vertices =
        gather_obstacle_vertices(obstacles, eye, forward, view_angle_deg, view_distance);

    vertices.push(FanVertex {
        position: first_boundary,
        leftmost: true,
        rightmost: false,
    });
    vertices.push(FanVertex {
        position: last_boundary,
        leftmost: false,
        rightmost: true,
    });

    sort_by_angle(&mut vertices, eye, first_boundary);

    sweep_triangles(obstacles, &vertices, eye, view_distance, ray_offset)
}

/// Сбор углов препятствий, попадающих в сектор
///
/// Боксы ниже высоты глаз не заслоняют и пропускаются целиком. Четыре угла
/// каждого бокса сортируются по углу от направления «за левым краем» сектора
/// (стабильный референс для всего бокса), затем фильтруются по углу и
/// дальности; угловые экстремумы бокса получают флаги leftmost/rightmost.
fn gather_obstacle_vertices(
    obstacles: &ObstacleSet,
    eye: Vec3,
    forward: Vec3,
    view_angle_deg: f32,
    view_distance: f32,
) -> Vec<FanVertex> {
    let mut vertices = Vec::new();

    // Референс сортировки углов бокса: заведомо левее любого видимого угла
    let corner_reference = rotate_yaw_deg(forward, -view_angle_deg * 2.0);

    for obstacle in &obstacles.obstacles {
        if obstacle.top() < eye.z {
            continue;
        }

        let mut corners = obstacle.upper_corners_at(eye.z);
        corners.sort_by(|a, b| {
            let angle_a = angle_2d_deg(corner_reference, *a - eye);
            let angle_b = angle_2d_deg(corner_reference, *b - eye);
            angle_a.partial_cmp(&angle_b).unwrap_or(std::cmp::Ordering::Equal)
        });

        for (counter, corner) in corners.into_iter().enumerate() {
            let angle = angle_2d_deg(corner - eye, forward);
            if angle < view_angle_deg {
                let distance = corner.distance(eye);
                if distance < view_distance {
                    vertices.push(FanVertex {
                        position: corner,
                        leftmost: counter == 0,
                        rightmost: counter == 3,
                    });
                }
            }
        }
    }

    vertices
}

/// Сортировка всех вершин по углу от первого граничного луча (возрастание —
/// развёртка идёт от одного края сектора к другому)
fn sort_by_angle(vertices: &mut [FanVertex], eye: Vec3, first_boundary: Vec3) {
    let reference = first_boundary - eye;
    vertices.sort_by(|a, b| {
        let angle_a = angle_2d_deg(reference, a.position - eye);
        let angle_b = angle_2d_deg(reference, b.position - eye);
        angle_a.partial_cmp(&angle_b).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Развёртка: луч через каждую вершину, треугольник на каждую пару соседних
/// эффективных точек
///
/// Ключевая тонкость — частично заслонённые углы. Если луч до вершины чист,
/// но вершина — угловой экстремум бокса, веер должен обернуться вокруг угла:
/// для leftmost дальним углом треугольника становится ПРОЕКЦИЯ луча, а дальше
/// развёртка продолжается от самой вершины (для rightmost — зеркально).
/// Иначе между боксом и фоном остаётся дыра.
fn sweep_triangles(
    obstacles: &ObstacleSet,
    vertices: &[FanVertex],
    eye: Vec3,
    view_distance: f32,
    ray_offset: f32,
) -> Vec<Triangle> {
    let mut triangles = Vec::new();
    let mut previous: Option<Vec3> = None;

    for vertex in vertices {
        let direction = (vertex.position - eye).normalize_or_zero();
        if direction == Vec3::ZERO {
            continue;
        }

        // Чуть за вершину, чтобы угол собственного бокса не съел луч
        let probe_target = vertex.position + direction * ray_offset;
        let max_projected = eye + direction * view_distance;

        let hit = obstacles.raycast_2d(eye, probe_target);

        let Some(prev) = previous else {
            // Первый луч только задаёт стартовую точку развёртки
            previous = Some(match hit {
                Some(impact) => impact,
                None => obstacles.raycast_2d(eye, max_projected).unwrap_or(max_projected),
            });
            continue;
        };

        let far;
        match hit {
            Some(impact) => {
                far = impact;
                previous = Some(impact);
            }
            None => {
                let projected = obstacles
                    .raycast_2d(eye, max_projected)
                    .unwrap_or(max_projected);

                if vertex.leftmost {
                    far = projected;
                    previous = Some(vertex.position);
                } else if vertex.rightmost {
                    far = vertex.position;
                    previous = Some(projected);
                } else {
                    far = vertex.position;
                    previous = Some(vertex.position);
                }
            }
        }

        triangles.push(Triangle::new(far, eye, prev));
    }

    triangles
}
