//! Скоринг кандидатных позиций для environment-query потребителей
//!
//! Чистые функции поверх prediction-карты и общих карт выборов: внешний
//! query-слой гоняет их по своим item'ам, внутренние системы — по своим
//! кандидатам. Деления на ноль гардятся, NaN наружу не выходит.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::influence::InfluenceMap;

/// Оценка «рядом с вероятной позицией игрока»
///
/// 0.6 — собственный influence клетки, 0.4 — средний по walkable-соседям:
/// пик с сильной окрестностью ценнее одинокого выброса. Вне решётки — 0.
pub fn score_high_influence(map: &InfluenceMap, location: Vec3) -> f32 {
    let Some(tile) = map.tile_at_world(location.truncate()) else {
        return 0.0;
    };

    let neighbors = map.walkable_neighbors(tile.index);
    if neighbors.is_empty() {
        return 0.6 * tile.influence;
    }

    let neighbor_sum: f32 = neighbors.iter().map(|n| n.influence).sum();
    0.6 * tile.influence + 0.4 * (neighbor_sum / neighbors.len() as f32)
}

/// Оценка разноса: средняя дистанция от item до поисковых выборов других
/// ботов — дальше от чужих точек значит меньше толкотни
///
/// Никто больше не выбирал — 0 (нечего разносить).
pub fn score_search_spread(
    chosen: &HashMap<Entity, Vec3>,
    me: Entity,
    item: Vec3,
) -> f32 {
    let mut sum = 0.0;
    let mut count = 0u32;

    for (bot, position) in chosen {
        if *bot == me {
            continue;
        }
        sum += position.distance(item);
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }
    sum / count as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InfluenceConfig;
    use crate::world::WorldBounds;

    fn map_with_peak() -> InfluenceMap {
        let config = InfluenceConfig {
            grid_width: 10,
            grid_height: 10,
            ..Default::default()
        };
        let bounds = WorldBounds::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        let mut map = InfluenceMap::new(bounds, &config, |_| true);
        map.set_influence_at_world(Vec2::new(55.0, 55.0), 200.0);
        map
    }

    #[test]
    fn test_high_influence_prefers_peak() {
        let map = map_with_peak();
        let at_peak = score_high_influence(&map, Vec3::new(55.0, 55.0, 0.0));
        let far_away = score_high_influence(&map, Vec3::new(5.0, 5.0, 0.0));
        assert!(at_peak > far_away);
        assert!((at_peak - 120.0).abs() < 1.0e-3); // 0.6 * 200, соседи пустые
    }

    #[test]
    fn test_high_influence_out_of_grid_is_zero() {
        let map = map_with_peak();
        assert_eq!(score_high_influence(&map, Vec3::new(900.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_search_spread_ignores_own_choice() {
        let me = Entity::from_raw(1);
        let other = Entity::from_raw(2);

        let mut chosen = HashMap::new();
        chosen.insert(me, Vec3::ZERO);
        assert_eq!(score_search_spread(&chosen, me, Vec3::new(50.0, 0.0, 0.0)), 0.0);

        chosen.insert(other, Vec3::new(100.0, 0.0, 0.0));
        let score = score_search_spread(&chosen, me, Vec3::new(50.0, 0.0, 0.0));
        assert!((score - 50.0).abs() < 1.0e-3);
    }
}
