//! Приём perception-событий и зеркалирование позы игрока
//!
//! Sight даёт и забирает референс игрока; hearing обновляет только last-known
//! позицию. Пока референс жив, поза игрока зеркалится в blackboard каждый
//! тик — last-known всегда свежий на момент потери.

use bevy::prelude::*;

use crate::ai::{Blackboard, ControllerMemory, PerceptionEvent, Stimulus};
use crate::components::{Bot, Facing, Player, WorldPosition};

/// Система: обновление «игрок известен» по стимулам восприятия
pub fn process_perception_events(
    mut events: EventReader<PerceptionEvent>,
    mut bots: Query<(&mut Blackboard, &mut ControllerMemory), With<Bot>>,
    players: Query<(), With<Player>>,
    positions: Query<&WorldPosition>,
) {
    for event in events.read() {
        let Ok((mut blackboard, mut memory)) = bots.get_mut(event.observer) else {
            continue;
        };
        // Стимулы от не-игроков контроллеру не интересны
        if players.get(event.target).is_err() {
            continue;
        }

        match event.stimulus {
            Stimulus::Sight => {
                if event.gained {
                    blackboard.player = Some(event.target);
                    blackboard.player_lost = false;
                    memory.never_saw_player = false;
                    crate::log(&format!(
                        "👁 AI: {:?} spotted player {:?}",
                        event.observer, event.target
                    ));
                } else {
                    // Из виду пропал; last-known остаётся на память
                    blackboard.player = None;
                    crate::log(&format!(
                        "👻 AI: {:?} lost sight of player",
                        event.observer
                    ));
                }
            }
            Stimulus::Hearing => {
                if event.gained {
                    if let Ok(position) = positions.get(event.target) {
                        blackboard.player_location = position.position;
                        memory.never_saw_player = false;
                    }
                }
            }
        }
    }
}

/// Система: зеркалирование позы известного игрока в blackboard
///
/// Протухший референс (игрок деспавнился) сбрасывается здесь же.
pub fn update_player_pose(
    mut bots: Query<&mut Blackboard, With<Bot>>,
    players: Query<(&WorldPosition, &Facing), With<Player>>,
) {
    for mut blackboard in bots.iter_mut() {
        let Some(player) = blackboard.player else {
            continue;
        };
        let Ok((position, facing)) = players.get(player) else {
            blackboard.player = None;
            continue;
        };
        blackboard.player_location = position.position;
        blackboard.player_forward = facing.forward;
    }
}
