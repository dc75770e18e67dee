//! Tests for target memory hysteresis.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::memory::{TargetMemory, TargetStatus};
    use crate::perception::Sighting;

    fn sighting(target: Entity, position: Vec3) -> Sighting {
        Sighting {
            target,
            position,
            distance: position.length(),
            angle: 0.0,
        }
    }

    #[test]
    fn test_memory_default_is_empty() {
        let memory = TargetMemory::default();
        assert_eq!(memory.status(0.0, 3.0), TargetStatus::Empty);
        assert_eq!(memory.time_since_last_seen(10.0), f32::INFINITY);
        assert!(!memory.is_active());
    }

    #[test]
    fn test_sighting_makes_target_active() {
        let target = Entity::from_raw(7);
        let mut memory = TargetMemory::default();

        assert!(memory.record_sighting(&sighting(target, Vec3::new(0.0, 0.0, -4.0)), 1.0));
        assert_eq!(memory.status(1.0, 3.0), TargetStatus::Active);
        assert_eq!(memory.current_target, Some(target));
        assert_eq!(memory.last_seen_position, Vec3::new(0.0, 0.0, -4.0));

        // Повторное наблюдение той же цели: не новое обнаружение
        assert!(!memory.record_sighting(&sighting(target, Vec3::new(0.0, 0.0, -3.0)), 1.1));
    }

    #[test]
    fn test_miss_keeps_target_until_window_expires() {
        let target = Entity::from_raw(7);
        let mut memory = TargetMemory::default();
        memory.record_sighting(&sighting(target, Vec3::ZERO), 0.0);

        assert!(memory.record_miss());
        assert!(!memory.record_miss()); // второй miss: уже не переход
        assert_eq!(memory.current_target, Some(target));

        assert_eq!(memory.status(2.9, 3.0), TargetStatus::Retained);
        assert!(!memory.should_forget(3.0, 3.0)); // ровно на границе ещё помним
        assert!(memory.should_forget(3.1, 3.0));
        assert_eq!(memory.status(3.1, 3.0), TargetStatus::Empty);
    }

    #[test]
    fn test_forget_clears_target() {
        let target = Entity::from_raw(3);
        let mut memory = TargetMemory::default();
        memory.record_sighting(&sighting(target, Vec3::X), 0.0);

        assert_eq!(memory.forget(), Some(target));
        assert_eq!(memory.current_target, None);
        assert!(!memory.visible_now);
        // Last seen position остаётся: это search anchor
        assert_eq!(memory.last_seen_position, Vec3::X);
    }
}
