//! Общие карты выбранных позиций — координация ботов
//!
//! Чтобы боты не сбивались в кучу, каждый публикует свой выбор атакующей и
//! поисковой позиции; скоринг остальных отталкивается от чужих выборов.
//! Владеет картами слой координации матча (этот ресурс), ключ — entity бота.

use std::collections::HashMap;

use bevy::prelude::*;

/// Выбранные ботами тактические позиции
#[derive(Resource, Debug, Clone, Default)]
pub struct SharedTacticalPositions {
    /// Кто какую атакующую позицию застолбил
    pub attack: HashMap<Entity, Vec3>,
    /// Кто куда пошёл искать
    pub search: HashMap<Entity, Vec3>,
}

impl SharedTacticalPositions {
    /// Убрать все следы бота (смерть/деспавн)
    pub fn forget(&mut self, bot: Entity) {
        self.attack.remove(&bot);
        self.search.remove(&bot);
    }
}
