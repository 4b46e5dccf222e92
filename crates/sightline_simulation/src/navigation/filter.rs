//! NavQueryFilter — edge-cost с надбавкой за просматриваемую территорию
//!
//! Сегмент пути шагается фиксированным числом равных параметрических шагов
//! (t ∈ [0,1] — завершение гарантировано при любой длине сегмента), стоимость
//! каждого шага — квадрат его длины. Подряд идущие шаги внутри веера
//! видимости копятся отдельной «опасной» суммой и при выходе из веера (или в
//! конце сегмента) добавляются с множителем DANGER_MULTIPLIER: непрерывная
//! пробежка под взглядом дороже, чем та же дистанция, разбитая укрытиями.

use bevy::prelude::*;

use crate::geometry::Triangle;

/// Число шагов разбиения сегмента
const COST_STEPS: u32 = 10;

/// Сегмент короче этого стоит ноль (вырожденный запрос)
const MIN_SEGMENT_LENGTH: f32 = 1.0;

/// Надбавка за непрерывный проход через видимую зону
pub const DANGER_MULTIPLIER: f32 = 1.1;

/// Базовая стоимость единицы пути
const DEFAULT_AREA_COST: f32 = 1.0;

/// Стоимость, исключающая area из поиска
pub const UNWALKABLE_COST: f32 = f32::MAX;

/// Максимум поддерживаемых area-типов
pub const MAX_AREAS: usize = 64;

/// Default query filter поиска пути
///
/// Area-costs, include/exclude флаги и backtracking — прямые passthrough'и
/// контракта навмеш-фильтра; вся логика — в segment_cost/position_cost.
#[derive(Resource, Debug, Clone)]
pub struct NavQueryFilter {
    visibility: Vec<Triangle>,
    area_costs: [f32; MAX_AREAS],
    fixed_area_costs: [f32; MAX_AREAS],
    include_flags: u16,
    exclude_flags: u16,
    backtracking: bool,
}

impl Default for NavQueryFilter {
    fn default() -> Self {
        Self {
            visibility: Vec::new(),
            area_costs: [DEFAULT_AREA_COST; MAX_AREAS],
            fixed_area_costs: [0.0; MAX_AREAS],
            include_flags: u16::MAX,
            exclude_flags: 0,
            backtracking: false,
        }
    }
}

impl NavQueryFilter {
    pub fn new(visibility: Vec<Triangle>) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    /// Обновить веер видимости (вызывается раз в кадр после пересчёта)
    pub fn set_visibility(&mut self, visibility: Vec<Triangle>) {
        self.visibility = visibility;
    }

    /// Точка под взглядом игрока
    pub fn position_is_visible(&self, position: Vec2) -> bool {
        self.visibility.iter().any(|t| t.contains_2d(position))
    }

    /// Стоимость прохода сегмента от start до end
    pub fn segment_cost(&self, start: Vec2, end: Vec2) -> f32 {
        if start.distance(end) < MIN_SEGMENT_LENGTH {
            return 0.0;
        }

        let step = (end - start) / COST_STEPS as f32;

        let mut cost = 0.0;
        let mut danger_run = 0.0;
        let mut previous = start;

        for i in 1..=COST_STEPS {
            let current = start + step * i as f32;
            let step_cost = previous.distance_squared(current) * DEFAULT_AREA_COST;

            if self.position_is_visible(previous) {
                danger_run += step_cost;
            } else {
                if danger_run > 0.0 {
                    cost += danger_run * DANGER_MULTIPLIER;
                    danger_run = 0.0;
                }
                cost += step_cost;
            }

            previous = current;
        }

        if danger_run > 0.0 {
            cost += danger_run * DANGER_MULTIPLIER;
        }

        cost
    }

    /// Точечная стоимость: зона под взглядом в разы дороже базовой
    pub fn position_cost(&self, position: Vec2) -> f32 {
        if self.position_is_visible(position) {
            20.0
        } else {
            DEFAULT_AREA_COST
        }
    }

    // --- passthrough-поверхность контракта навмеш-фильтра ---

    /// Задать стоимость area-типа; false — тип вне диапазона
    pub fn set_area_cost(&mut self, area: u8, cost: f32) -> bool {
        match self.area_costs.get_mut(area as usize) {
            Some(slot) => {
                *slot = cost;
                true
            }
            None => false,
        }
    }

    pub fn area_cost(&self, area: u8) -> Option<f32> {
        self.area_costs.get(area as usize).copied()
    }

    pub fn set_fixed_area_entering_cost(&mut self, area: u8, cost: f32) -> bool {
        match self.fixed_area_costs.get_mut(area as usize) {
            Some(slot) => {
                *slot = cost;
                true
            }
            None => false,
        }
    }

    pub fn fixed_area_entering_cost(&self, area: u8) -> Option<f32> {
        self.fixed_area_costs.get(area as usize).copied()
    }

    /// Исключить area из поиска
    pub fn set_excluded_area(&mut self, area: u8) -> bool {
        self.set_area_cost(area, UNWALKABLE_COST)
    }

    pub fn set_include_flags(&mut self, flags: u16) {
        self.include_flags = flags;
    }

    pub fn include_flags(&self) -> u16 {
        self.include_flags
    }

    pub fn set_exclude_flags(&mut self, flags: u16) {
        self.exclude_flags = flags;
    }

    pub fn exclude_flags(&self) -> u16 {
        self.exclude_flags
    }

    pub fn set_backtracking_enabled(&mut self, backtracking: bool) {
        self.backtracking = backtracking;
    }

    pub fn is_backtracking_enabled(&self) -> bool {
        self.backtracking
    }
}
