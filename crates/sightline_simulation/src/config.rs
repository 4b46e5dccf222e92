//! Тюнинг-константы tactical-слоя как ресурсы
//!
//! Всё, что в прототипе было зашито по месту, собрано в два ресурса с
//! дефолтами боевого тюнинга. Тесты и хост переопределяют через
//! `insert_resource`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры восприятия и тактических проверок
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct TacticalConfig {
    /// Половина угла FOV игрока/бота (градусы от forward в каждую сторону)
    pub fov_angle_deg: f32,
    /// Дальность зрения
    pub view_distance: f32,
    /// Высота глаз (абсолютный мировой Z — арена плоская)
    pub eye_height: f32,
    /// Насколько луч развёртки продлевается за вершину (self-occlusion guard)
    pub ray_offset: f32,
    /// Ближе этого игрок считается «рядом»
    pub min_player_distance: f32,
    /// Потеря HP за тик, начиная с которой бот считает что его обстреливают
    pub damage_threshold: u32,
    /// Базовая выдержка флага taking_damage (секунды)
    pub regen_wait: f32,
    /// Случайная добавка к выдержке, 0..=jitter (секунды)
    pub regen_wait_jitter: f32,
    /// Период осматривания в Search (секунды)
    pub lookaround_period: f32,
    /// Амплитуда осматривания (градусы yaw)
    pub lookaround_angle_deg: f32,
    /// Полурадиус сканирования cover-точек вокруг attack-кандидата
    pub cover_search_half_extent: f32,
    /// Шаг сканирования cover-точек
    pub cover_search_step: f32,
    /// Порог clip ratio «перезаряжаться немедленно»
    pub reload_now_ratio: f32,
    /// Порог clip ratio «скоро перезаряжаться»
    pub reload_soon_ratio: f32,
    /// Радиус достижения патрульной точки
    pub patrol_arrival_radius: f32,
    /// Радиус, в котором союзный бот перекрывает линию огня
    pub bot_block_radius: f32,
}

impl Default for TacticalConfig {
    fn default() -> Self {
        Self {
            fov_angle_deg: 50.0,
            view_distance: 5500.0,
            eye_height: 150.0,
            ray_offset: 10.0,
            min_player_distance: 750.0,
            damage_threshold: 15,
            regen_wait: 5.0,
            regen_wait_jitter: 7.0,
            lookaround_period: 2.0,
            lookaround_angle_deg: 35.0,
            cover_search_half_extent: 250.0,
            cover_search_step: 10.0,
            reload_now_ratio: 0.10,
            reload_soon_ratio: 0.40,
            patrol_arrival_radius: 100.0,
            bot_block_radius: 50.0,
        }
    }
}

/// Параметры influence-грида (prediction map)
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct InfluenceConfig {
    /// Вес нового значения при lerp'е: 0 — история, 1 — чистый прогноз
    pub momentum: f32,
    /// Скорость затухания influence с расстоянием
    pub decay: f32,
    /// Минимальный интервал между проходами propagate (секунды)
    pub update_frequency: f32,
    /// Разрешение грида
    pub grid_width: usize,
    pub grid_height: usize,
    /// Значение, которым сеется last-known позиция игрока
    pub seed_influence: f32,
}

impl Default for InfluenceConfig {
    fn default() -> Self {
        Self {
            momentum: 0.6,
            decay: 0.0001,
            update_frequency: 0.5,
            grid_width: 64,
            grid_height: 64,
            seed_influence: 255.0,
        }
    }
}
