//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (faction, health) + маркеры Player/Bot
//! - world: позиционирование и взгляд (WorldPosition, Facing, FieldOfView)

pub mod actor;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use world::*;
