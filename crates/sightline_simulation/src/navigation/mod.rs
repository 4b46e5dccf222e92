//! Navigation Cost Filter — цена ходьбы под взглядом игрока
//!
//! Сам навмеш и поиск пути живут у хоста; здесь — реализация edge-cost
//! фильтра, которую хост регистрирует как default query filter. Фильтр
//! держит веер видимости текущего кадра и делает пересечение сегмента с
//! просматриваемой территорией дороже: путь предпочитает жаться к укрытиям,
//! не превращая открытые зоны в непроходимые.
//!
//! Снапшот в фильтр заливается системой ниже сразу после пересчёта
//! visibility — до того, как хост успеет спросить стоимость.

use bevy::prelude::*;

pub mod filter;

pub use filter::{NavQueryFilter, DANGER_MULTIPLIER, MAX_AREAS, UNWALKABLE_COST};

use crate::vision::PlayerVisibility;
use crate::SimulationSet;

/// Navigation Plugin
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavQueryFilter>().add_systems(
            FixedUpdate,
            sync_filter_visibility.in_set(SimulationSet::Influence),
        );
    }
}

/// Система: заливка веера кадра в default-фильтр
pub fn sync_filter_visibility(
    snapshot: Res<PlayerVisibility>,
    mut filter: ResMut<NavQueryFilter>,
) {
    if snapshot.is_changed() {
        filter.set_visibility(snapshot.triangles.clone());
    }
}
