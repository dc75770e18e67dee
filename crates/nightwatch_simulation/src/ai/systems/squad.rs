//! Squad command relay (commander → roster).

use bevy::prelude::*;

use crate::ai::{CommandedTarget, SquadCommander, TargetMemory};
use crate::perception::PerceptionConfig;
use crate::SimulationClock;

/// System: commander рассылает свою Active цель roster'у
///
/// Рассылка каждый шаг, пока цель Active (timestamp = now). Retained цель
/// не рассылается: подчинённые доживают на последнем relay.
/// Despawned подчинённые пропускаются (debug лог), рассылка остальным продолжается.
pub fn relay_commander_targets(
    clock: Res<SimulationClock>,
    mut commanders: Query<(Entity, &mut SquadCommander, &TargetMemory)>,
    mut subordinates: Query<&mut CommandedTarget>,
    positions: Query<&Transform>,
) {
    let now = clock.now();

    for (commander_entity, mut commander, memory) in commanders.iter_mut() {
        let Some(target) = memory.current_target.filter(|_| memory.is_active()) else {
            commander.has_issued_command = false;
            continue;
        };

        let position = positions
            .get(target)
            .map(|transform| transform.translation)
            .unwrap_or(memory.last_seen_position);

        for &subordinate in &commander.roster {
            if subordinate == commander_entity {
                continue;
            }
            match subordinates.get_mut(subordinate) {
                Ok(mut commanded) => commanded.receive(target, position, now, commander_entity),
                Err(_) => crate::log(&format!(
                    "{:?}: roster member {:?} missing, skipped",
                    commander_entity, subordinate
                )),
            }
        }

        if !commander.has_issued_command {
            commander.has_issued_command = true;
            crate::log(&format!(
                "📣 Commander {:?} → {} subordinates: attack {:?}",
                commander_entity,
                commander.roster.len(),
                target
            ));
        }
    }
}

/// System: истечение командного target (`2 × lose_target_duration` без relay)
pub fn expire_commanded_targets(
    clock: Res<SimulationClock>,
    mut subordinates: Query<(Entity, &PerceptionConfig, &mut CommandedTarget)>,
    live: Query<Entity>,
) {
    let now = clock.now();

    for (entity, config, mut commanded) in subordinates.iter_mut() {
        let Some(target) = commanded.target else {
            continue;
        };

        if !live.contains(target) {
            commanded.clear();
            crate::log(&format!("{:?}: commanded target {:?} despawned", entity, target));
            continue;
        }

        if commanded.is_expired(now, config.lose_target_duration) {
            commanded.clear();
            crate::log(&format!(
                "⌛ {:?}: commanded target {:?} expired (relayed at {:.2}s)",
                entity, target, commanded.relayed_at
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::logger::{set_logger, LogLevel, LogPrinter};

    struct CapturePrinter(Arc<Mutex<Vec<(LogLevel, String)>>>);

    impl LogPrinter for CapturePrinter {
        fn log(&self, level: LogLevel, message: &str) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push((level, message.to_string()));
            }
        }
    }

    #[test]
    fn test_missing_roster_member_skipped_quietly() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        set_logger(Box::new(CapturePrinter(captured.clone())));

        let mut world = World::new();
        world.insert_resource(SimulationClock::manual());

        let target = world.spawn(Transform::from_xyz(0.0, 0.0, -5.0)).id();
        let missing = world.spawn_empty().id();
        world.despawn(missing);
        let subordinate = world.spawn(CommandedTarget::default()).id();
        let commander = world
            .spawn((
                SquadCommander::new(vec![missing, subordinate]),
                TargetMemory {
                    current_target: Some(target),
                    last_seen_position: Vec3::new(0.0, 0.0, -5.0),
                    last_seen_at: Some(0.0),
                    visible_now: true,
                },
            ))
            .id();

        for _ in 0..3 {
            world
                .run_system_once(relay_commander_targets)
                .expect("relay should run");
        }

        // Остальные члены roster'а получают команду
        let commanded = world.get::<CommandedTarget>(subordinate).expect("subordinate");
        assert_eq!(commanded.target, Some(target));
        assert_eq!(commanded.commander, Some(commander));

        let marker = format!("roster member {:?} missing", missing);
        let lines = captured.lock().expect("capture lock");
        let skipped: Vec<_> = lines
            .iter()
            .filter(|(_, message)| message.contains(&marker))
            .collect();
        assert_eq!(skipped.len(), 3);
        assert!(skipped.iter().all(|(level, _)| *level == LogLevel::Debug));
    }
}
