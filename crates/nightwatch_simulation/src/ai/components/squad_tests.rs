//! Tests for squad components.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::squad::{CommandedTarget, SquadCommander, COMMAND_EXPIRY_FACTOR};

    #[test]
    fn test_commanded_target_expiry_window() {
        let mut commanded = CommandedTarget::default();
        commanded.receive(Entity::from_raw(1), Vec3::ZERO, 1.0, Entity::from_raw(2));

        // lose_target_duration = 3 → окно 6 секунд
        assert!(!commanded.is_expired(7.0, 3.0));
        assert!(commanded.is_expired(7.01, 3.0));

        assert_eq!(commanded.clear(), Some(Entity::from_raw(1)));
        assert!(!commanded.is_present());
        assert!(!commanded.is_expired(100.0, 3.0));
    }

    #[test]
    fn test_receive_refreshes_relay() {
        let mut commanded = CommandedTarget::default();
        commanded.receive(Entity::from_raw(1), Vec3::X, 1.0, Entity::from_raw(5));
        commanded.receive(Entity::from_raw(1), Vec3::Z, 4.0, Entity::from_raw(5));

        assert_eq!(commanded.relayed_position, Vec3::Z);
        assert_eq!(commanded.relayed_at, 4.0);
        assert_eq!(commanded.commander, Some(Entity::from_raw(5)));
        assert!(!commanded.is_expired(4.0 + COMMAND_EXPIRY_FACTOR * 3.0, 3.0));
    }

    #[test]
    fn test_new_commander_has_not_issued_command() {
        let roster = vec![Entity::from_raw(1), Entity::from_raw(2)];
        let commander = SquadCommander::new(roster.clone());
        assert_eq!(commander.roster, roster);
        assert!(!commander.has_issued_command);
    }
}
