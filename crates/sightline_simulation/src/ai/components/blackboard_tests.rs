//! Tests for AI components (blackboard defaults, memory, coordination).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::blackboard::{Blackboard, BotState};
    use super::super::coordination::SharedTacticalPositions;
    use super::super::memory::ControllerMemory;

    #[test]
    fn test_blackboard_defaults() {
        let blackboard = Blackboard::default();
        assert_eq!(blackboard.state, BotState::Idle);
        assert!(!blackboard.player_known());
        assert!(!blackboard.player_is_visible);
        assert!(!blackboard.i_am_visible);
        assert!(!blackboard.player_lost);
        assert_eq!(blackboard.next_attack_location, Vec3::ZERO);
    }

    #[test]
    fn test_memory_defaults() {
        let memory = ControllerMemory::default();
        assert!(memory.never_saw_player);
        assert_eq!(memory.patrol_index, 0);
        assert_eq!(memory.prediction_seed, None);
    }

    #[test]
    fn test_shared_positions_forget() {
        let mut shared = SharedTacticalPositions::default();
        let bot = Entity::from_raw(3);
        shared.attack.insert(bot, Vec3::new(1.0, 2.0, 0.0));
        shared.search.insert(bot, Vec3::new(3.0, 4.0, 0.0));

        shared.forget(bot);
        assert!(shared.attack.is_empty());
        assert!(shared.search.is_empty());
    }
}
