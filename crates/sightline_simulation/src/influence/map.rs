//! InfluenceMap — решётка «где может быть игрок»
//!
//! Диффузионная модель угрозы поверх прямоугольника мира: influence затухает
//! с расстоянием (exp(-d·decay)) и растекается от last-known позиции игрока,
//! momentum смешивает историю с прогнозом. Клетки, которые сейчас видит
//! хоть один наблюдающий бот, прячут игрока не могут — после каждого прохода
//! продавливаются в сентинел.
//!
//! Распространение двухбуферное: проход пишет в теневой буфер, затем swap —
//! иначе результат зависит от порядка обхода клеток внутри прохода.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::config::InfluenceConfig;
use crate::geometry::Triangle;
use crate::world::WorldBounds;

/// Influence клетки под прямым наблюдением: «тут игрока точно нет»
pub const VISIBILITY_SENTINEL: f32 = -100_000.0;

/// Chebyshev-радиус соседства при распространении
const NEIGHBOR_LEVELS: i32 = 2;

/// Одна клетка решётки (снимок по значению)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluenceTile {
    pub x: i32,
    pub y: i32,
    pub index: usize,
    pub walkable: bool,
    pub influence: f32,
}

/// Решётка влияния одного prediction-эпизода
///
/// Живёт, пока позиция игрока неизвестна; пересоздаётся при свежем
/// last-known и уничтожается, как только игрок снова в прямой видимости.
#[derive(Debug, Clone)]
pub struct InfluenceMap {
    width: usize,
    height: usize,
    bounds: WorldBounds,
    momentum: f32,
    decay: f32,
    update_frequency: f32,
    walkable: Vec<bool>,
    influence: Vec<f32>,
    /// Теневой буфер распространения (swap после прохода)
    scratch: Vec<f32>,
    timer: f32,
    /// Veер видимости каждого наблюдающего бота
    bot_visibility: HashMap<Entity, Vec<Triangle>>,
}

impl InfluenceMap {
    /// Создать решётку над bounds; walkability клетки определяет предикат
    /// по мировой позиции её центра (обычно — footprint'ы cover-боксов)
    pub fn new(
        bounds: WorldBounds,
        config: &InfluenceConfig,
        is_walkable: impl Fn(Vec2) -> bool,
    ) -> Self {
        let width = config.grid_width.max(1);
        let height = config.grid_height.max(1);

        let mut map = Self {
            width,
            height,
            bounds,
            momentum: config.momentum,
            decay: config.decay,
            update_frequency: config.update_frequency,
            walkable: vec![true; width * height],
            influence: vec![0.0; width * height],
            scratch: vec![0.0; width * height],
            timer: 0.0,
            bot_visibility: HashMap::new(),
        };

        for index in 0..width * height {
            let (x, y) = map.coords_of(index);
            map.walkable[index] = is_walkable(map.grid_to_world(x, y));
        }

        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Линейный индекс клетки; None вне решётки
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    fn coords_of(&self, index: usize) -> (i32, i32) {
        ((index % self.width) as i32, (index / self.width) as i32)
    }

    fn tile_unchecked(&self, index: usize) -> InfluenceTile {
        let (x, y) = self.coords_of(index);
        InfluenceTile {
            x,
            y,
            index,
            walkable: self.walkable[index],
            influence: self.influence[index],
        }
    }

    /// Клетка по индексу; None вне `[0, width*height)`
    pub fn tile(&self, index: usize) -> Option<InfluenceTile> {
        (index < self.influence.len()).then(|| self.tile_unchecked(index))
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<InfluenceTile> {
        self.index_of(x, y).map(|index| self.tile_unchecked(index))
    }

    /// Клетка, накрывающая мировую позицию
    pub fn tile_at_world(&self, position: Vec2) -> Option<InfluenceTile> {
        let (x, y) = self.world_to_grid(position)?;
        self.tile_at(x, y)
    }

    /// Мировая позиция → координаты решётки (affine rescale)
    pub fn world_to_grid(&self, position: Vec2) -> Option<(i32, i32)> {
        let size = self.bounds.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }

        let x = ((position.x - self.bounds.min.x) / size.x * self.width as f32).floor() as i32;
        let y = ((position.y - self.bounds.min.y) / size.y * self.height as f32).floor() as i32;

        self.index_of(x, y).map(|_| (x, y))
    }

    /// Координаты решётки → мировая позиция клетки
    pub fn grid_to_world(&self, x: i32, y: i32) -> Vec2 {
        let size = self.bounds.size();
        Vec2::new(
            self.bounds.min.x + x as f32 / self.width as f32 * size.x,
            self.bounds.min.y + y as f32 / self.height as f32 * size.y,
        )
    }

    /// Записать influence; false (и никакой записи) для non-walkable клетки
    /// или индекса вне решётки
    pub fn set_influence(&mut self, index: usize, value: f32) -> bool {
        match self.walkable.get(index) {
            Some(true) => {
                self.influence[index] = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_influence_at_world(&mut self, position: Vec2, value: f32) -> bool {
        match self.world_to_grid(position) {
            Some((x, y)) => {
                // index_of валиден после world_to_grid
                match self.index_of(x, y) {
                    Some(index) => self.set_influence(index, value),
                    None => false,
                }
            }
            None => false,
        }
    }

    /// Walkable-соседи в Chebyshev-радиусе 2, без самой клетки
    pub fn walkable_neighbors(&self, index: usize) -> Vec<InfluenceTile> {
        let Some(tile) = self.tile(index) else {
            return Vec::new();
        };

        let mut neighbors = Vec::new();
        for y in (tile.y - NEIGHBOR_LEVELS)..=(tile.y + NEIGHBOR_LEVELS) {
            for x in (tile.x - NEIGHBOR_LEVELS)..=(tile.x + NEIGHBOR_LEVELS) {
                if x == tile.x && y == tile.y {
                    continue;
                }
                let Some(neighbor_index) = self.index_of(x, y) else {
                    continue;
                };
                if self.walkable[neighbor_index] {
                    neighbors.push(self.tile_unchecked(neighbor_index));
                }
            }
        }
        neighbors
    }

    /// Обновить веер видимости бота (ключ — entity бота)
    pub fn set_bot_visibility(&mut self, bot: Entity, fan: Vec<Triangle>) {
        self.bot_visibility.insert(bot, fan);
    }

    /// Видна ли клетка хоть одному наблюдающему боту
    pub fn tile_is_visible(&self, x: i32, y: i32) -> bool {
        let world = self.grid_to_world(x, y);
        self.bot_visibility
            .values()
            .flatten()
            .any(|triangle| triangle.contains_2d(world))
    }

    /// Один проход распространения + маскирование наблюдаемых клеток
    ///
    /// Для каждой walkable невидимой клетки: максимум затухших influence
    /// соседей, затем lerp текущего значения к нему с весом momentum.
    /// Пишем в теневой буфер, swap, и только потом продавливаем сентинел —
    /// наблюдаемая клетка получает его независимо от результата прохода.
    pub fn propagate(&mut self) {
        for index in 0..self.influence.len() {
            self.scratch[index] = self.influence[index];

            if !self.walkable[index] {
                continue;
            }
            let (x, y) = self.coords_of(index);
            if self.tile_is_visible(x, y) {
                continue;
            }

            let current_world = self.grid_to_world(x, y);
            let mut max_influence = 0.0f32;
            for neighbor in self.walkable_neighbors(index) {
                let neighbor_world = self.grid_to_world(neighbor.x, neighbor.y);
                let distance = current_world.distance(neighbor_world);
                let decayed = neighbor.influence * (-distance * self.decay).exp();
                max_influence = max_influence.max(decayed);
            }

            let current = self.influence[index];
            self.scratch[index] = current + (max_influence - current) * self.momentum;
        }

        std::mem::swap(&mut self.influence, &mut self.scratch);

        for index in 0..self.influence.len() {
            if !self.walkable[index] {
                continue;
            }
            let (x, y) = self.coords_of(index);
            if self.tile_is_visible(x, y) {
                self.influence[index] = VISIBILITY_SENTINEL;
            }
        }
    }

    /// Тик эпизода: propagate не чаще update_frequency. true — проход был.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.timer > self.update_frequency {
            self.propagate();
            self.timer = 0.0;
            true
        } else {
            self.timer += delta;
            false
        }
    }

    /// Снимок для отладки/визуализации: influence, зажатый в [0, 255].
    /// Non-walkable клетки — 0.
    pub fn export_grayscale(&self) -> Vec<u8> {
        self.influence
            .iter()
            .zip(self.walkable.iter())
            .map(|(&influence, &walkable)| {
                if walkable {
                    influence.clamp(0.0, 255.0) as u8
                } else {
                    0
                }
            })
            .collect()
    }
}
