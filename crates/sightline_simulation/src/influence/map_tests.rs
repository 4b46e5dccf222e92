//! Tests for the influence grid (propagation, masking, bounds).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::map::{InfluenceMap, VISIBILITY_SENTINEL};
    use crate::config::InfluenceConfig;
    use crate::geometry::Triangle;
    use crate::world::WorldBounds;

    fn test_config() -> InfluenceConfig {
        InfluenceConfig {
            momentum: 0.6,
            decay: 0.0001,
            update_frequency: 0.5,
            grid_width: 10,
            grid_height: 10,
            seed_influence: 255.0,
        }
    }

    fn test_bounds() -> WorldBounds {
        // Клетка 10x10 мировых единиц
        WorldBounds::new(Vec2::ZERO, Vec2::new(100.0, 100.0))
    }

    fn open_map() -> InfluenceMap {
        InfluenceMap::new(test_bounds(), &test_config(), |_| true)
    }

    #[test]
    fn test_out_of_range_lookups_are_rejected() {
        let mut map = open_map();

        assert!(map.tile(99).is_some());
        assert!(map.tile(100).is_none());
        assert!(map.tile_at(-1, 0).is_none());
        assert!(map.tile_at(0, 10).is_none());

        assert!(!map.set_influence(100, 50.0));
        assert!(!map.set_influence_at_world(Vec2::new(-500.0, 0.0), 50.0));
        // Ничего не записалось
        assert!(map.tile(99).map(|t| t.influence) == Some(0.0));
    }

    #[test]
    fn test_non_walkable_tiles_never_change() {
        // Левые три колонки — стены
        let mut map = InfluenceMap::new(test_bounds(), &test_config(), |p| p.x >= 30.0);

        let blocked = map.tile_at(0, 5).expect("tile exists");
        assert!(!blocked.walkable);
        assert!(!map.set_influence(blocked.index, 99.0));
        assert_eq!(map.tile(blocked.index).map(|t| t.influence), Some(0.0));

        // И соседями не возвращаются
        let near = map.tile_at(4, 5).expect("tile exists");
        let neighbors = map.walkable_neighbors(near.index);
        assert!(neighbors.iter().all(|n| n.walkable));
        assert!(neighbors.iter().all(|n| n.x >= 3));
    }

    #[test]
    fn test_propagation_spreads_from_seed() {
        let mut map = open_map();
        let seed = map.tile_at(5, 5).expect("tile exists");
        assert!(map.set_influence(seed.index, 255.0));

        map.propagate();

        // Соседи в Chebyshev-радиусе 2 получили влияние
        let adjacent = map.tile_at(6, 5).expect("tile exists");
        assert!(adjacent.influence > 100.0);
        let two_away = map.tile_at(7, 5).expect("tile exists");
        assert!(two_away.influence > 100.0);
    }

    #[test]
    fn test_propagation_is_double_buffered() {
        // Клетка в Chebyshev-дистанции 3 от seed не может получить влияние
        // за один проход: каскад внутри прохода означал бы запись в живой буфер
        let mut map = open_map();
        let seed = map.tile_at(2, 2).expect("tile exists");
        map.set_influence(seed.index, 255.0);

        map.propagate();
        assert_eq!(map.tile_at(5, 2).map(|t| t.influence), Some(0.0));

        map.propagate();
        let after_second = map.tile_at(5, 2).expect("tile exists");
        assert!(after_second.influence > 0.0);
    }

    #[test]
    fn test_decay_converges_monotonically_without_overshoot() {
        let mut map = open_map();
        let center = map.tile_at(5, 5).expect("tile exists");

        // Константное соседство: после каждого прохода возвращаем соседям 100
        let neighbor_indices: Vec<usize> = map
            .walkable_neighbors(center.index)
            .iter()
            .map(|n| n.index)
            .collect();
        for &index in &neighbor_indices {
            map.set_influence(index, 100.0);
        }

        // Цель: ближайший сосед (10 единиц) с учётом затухания
        let target = 100.0 * (-10.0 * 0.0001f32).exp();

        let mut previous = 0.0;
        for _ in 0..50 {
            map.propagate();
            let current = map
                .tile(center.index)
                .map(|t| t.influence)
                .expect("tile exists");

            assert!(
                current >= previous,
                "сходимость монотонна: {current} < {previous}"
            );
            assert!(
                current <= target + 1.0e-3,
                "overshoot: {current} > {target}"
            );
            previous = current;

            for &index in &neighbor_indices {
                map.set_influence(index, 100.0);
            }
        }

        assert!((previous - target).abs() < 1.0);
    }

    #[test]
    fn test_visible_tiles_are_masked_to_sentinel() {
        let mut map = open_map();
        map.set_influence_at_world(Vec2::new(55.0, 55.0), 255.0);

        // Бот видит левую нижнюю четверть решётки
        let bot = Entity::from_raw(7);
        map.set_bot_visibility(
            bot,
            vec![Triangle::new(
                Vec3::new(60.0, 0.0, 150.0),
                Vec3::new(0.0, 0.0, 150.0),
                Vec3::new(0.0, 60.0, 150.0),
            )],
        );

        map.propagate();

        for y in 0..10 {
            for x in 0..10 {
                let tile = map.tile_at(x, y).expect("tile exists");
                if map.tile_is_visible(x, y) {
                    assert_eq!(
                        tile.influence, VISIBILITY_SENTINEL,
                        "наблюдаемая клетка ({x},{y}) обязана быть в сентинеле"
                    );
                } else {
                    assert!(tile.influence > VISIBILITY_SENTINEL);
                }
            }
        }
    }

    #[test]
    fn test_tick_respects_update_frequency() {
        let mut map = open_map();
        map.set_influence_at_world(Vec2::new(55.0, 55.0), 255.0);

        // Меньше update_frequency — прохода нет
        assert!(!map.tick(0.1));
        assert!(!map.tick(0.1));
        assert_eq!(map.tile_at(6, 5).map(|t| t.influence), Some(0.0));

        // Накопили больше 0.5 c — проход случился
        assert!(!map.tick(0.4));
        assert!(map.tick(0.1));
        assert!(map.tile_at(6, 5).expect("tile exists").influence > 0.0);
    }

    #[test]
    fn test_export_clamps_to_byte_range() {
        let mut map = open_map();
        map.set_influence_at_world(Vec2::new(55.0, 55.0), 500.0);
        map.set_influence_at_world(Vec2::new(15.0, 15.0), -42.0);

        let exported = map.export_grayscale();
        assert_eq!(exported.len(), 100);
        assert!(exported.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_world_grid_roundtrip() {
        let map = open_map();
        assert_eq!(map.world_to_grid(Vec2::new(55.0, 35.0)), Some((5, 3)));
        assert_eq!(map.grid_to_world(5, 3), Vec2::new(50.0, 30.0));
        assert!(map.world_to_grid(Vec2::new(150.0, 0.0)).is_none());
    }
}
