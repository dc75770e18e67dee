//! Target memory hysteresis (Active / Retained / Lost).

use bevy::prelude::*;

use crate::ai::{PerceptionEvent, TargetMemory};
use crate::perception::PerceptionConfig;
use crate::SimulationClock;

/// System: hysteresis окно памяти о цели
///
/// Каждый шаг (не только на sensor tick):
/// - visible_now → Active, ничего не делаем
/// - LOS потерян, окно открыто → Retained (pursuit идёт на last seen)
/// - окно истекло → цель забыта, `TargetLost` ровно один раз
///
/// Despawned цель считается потерянной сразу (weak reference).
pub fn update_target_memory(
    clock: Res<SimulationClock>,
    mut agents: Query<(Entity, &PerceptionConfig, &mut TargetMemory)>,
    live: Query<Entity>,
    mut events: EventWriter<PerceptionEvent>,
) {
    let now = clock.now();

    for (agent, config, mut memory) in agents.iter_mut() {
        let Some(target) = memory.current_target else {
            continue;
        };

        let despawned = !live.contains(target);
        if !despawned && !memory.should_forget(now, config.lose_target_duration) {
            continue;
        }

        let last_seen_position = memory.last_seen_position;
        memory.forget();

        if despawned {
            crate::log(&format!("💀 {:?}: target {:?} despawned → lost", agent, target));
        } else {
            crate::log(&format!(
                "❓ {:?}: lost {:?} ({:.2}s since last seen, last seen at {:?})",
                agent,
                target,
                memory.time_since_last_seen(now),
                last_seen_position
            ));
        }

        events.write(PerceptionEvent::TargetLost {
            agent,
            target,
            last_seen_position,
            lost_at: now,
        });
    }
}
