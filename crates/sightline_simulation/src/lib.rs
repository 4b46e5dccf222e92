//! SIGHTLINE Simulation Core
//!
//! Headless ECS-симуляция tactical-AI слоя шутера на Bevy 0.16:
//! - vision: visibility-веер игрока (общий снапшот кадра)
//! - influence: prediction-решётка «где может быть игрок», пока его не видно
//! - navigation: edge-cost фильтр, штрафующий просматриваемую территорию
//! - ai: blackboard + автомат Idle/Patrol/Search/Fight поверх этих данных
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (видимость, прогноз, решения, combat-стейт)
//! - Хост-движок = tactical layer (рендер, физика, навмеш, behavior tree)

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod geometry;
pub mod influence;
pub mod navigation;
pub mod vision;
pub mod world;

// Re-export базовых типов для удобства
pub use ai::{
    AIPlugin, Blackboard, BotState, ControllerMemory, PatrolRoute, PerceptionEvent,
    SharedTacticalPositions, Stimulus,
};
pub use combat::{CombatPlugin, DamageDealt, Dead, EntityDied, Weapon, WeaponFired};
pub use components::*;
pub use config::{InfluenceConfig, TacticalConfig};
pub use geometry::Triangle;
pub use influence::{InfluenceMap, InfluencePlugin, InfluenceTile, PredictionMap};
pub use navigation::{NavQueryFilter, NavigationPlugin};
pub use vision::{calculate_visibility, PlayerVisibility, VisionPlugin};
pub use world::{Obstacle, ObstacleSet, WorldBounds};

/// Фазы кадра симуляции
///
/// Жёсткий порядок: снапшот видимости обязан быть пересчитан раньше, чем его
/// прочитают influence-маскирование, nav-фильтр и decision-системы — иначе
/// они целый кадр едут на прошлом веере.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Приём perception-событий, зеркалирование позы игрока
    Perception,
    /// Пересчёт visibility-веера
    Vision,
    /// Prediction-карты + заливка веера в nav-фильтр
    Influence,
    /// Контроллер: автомат, тактические оценки, спуск
    Decision,
    /// Применение урона, таймеры оружия, выстрелы
    Combat,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Конфиги и мир (хост/тесты переопределяют своими)
            .init_resource::<TacticalConfig>()
            .init_resource::<InfluenceConfig>()
            .init_resource::<WorldBounds>()
            .init_resource::<ObstacleSet>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Perception,
                    SimulationSet::Vision,
                    SimulationSet::Influence,
                    SimulationSet::Decision,
                    SimulationSet::Combat,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((
                VisionPlugin,
                InfluencePlugin,
                NavigationPlugin,
                CombatPlugin,
                AIPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Один детерминированный тик симуляции
///
/// Продвигает Time<Fixed> ровно на период и гоняет FixedUpdate напрямую —
/// без зависимости от wall clock (тесты и headless-прогоны обязаны давать
/// бит-в-бит одинаковые траектории).
pub fn step_simulation(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(timestep);
    app.world_mut().run_schedule(FixedUpdate);
}

/// Snapshot компонентов мира для сравнения детерминизма
///
/// Debug-сериализация, отсортировано по Entity — стабильный формат для
/// побайтового сравнения прогонов.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

use once_cell::sync::Lazy;
use std::sync::Mutex;

// Потокобезопасный глобальный logger (host подменяет принтер своим)
static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

static LOGGER_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

pub fn set_logger(logger: Box<dyn LogPrinter>) {
    *LOGGER.lock().unwrap() = Some(logger);
}

pub fn set_log_level(level: LogLevel) {
    *LOGGER_LEVEL.lock().unwrap() = level;
}

pub fn set_logger_if_needed(logger: Box<dyn LogPrinter>) {
    if LOGGER.lock().unwrap().is_none() {
        set_logger(logger);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    // Timestamp добавляем здесь, принтер получает готовую строку
    if level < *LOGGER_LEVEL.lock().unwrap() {
        return;
    }
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        logger.log(level, &format!("[{}] {}", timestamp, message));
    }
}

struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}
