//! Perception sensor: rate-limited FOV scan → TargetMemory
//!
//! Заменяет coroutine polling (`while(true) { yield wait; check(); }`):
//! каждый агент копит время в `PerceptionTimer`, scan только по интервалу.

use bevy::prelude::*;

use super::fov::{scan_field_of_view, PerceptionConfig, PerceptionTimer, Sighting, Viewpoint};
use super::spatial::SpatialIndex;
use crate::ai::{PerceptionEvent, TargetMemory};
use crate::SimulationClock;

/// Применить результат scan к памяти агента
///
/// Успех: visible_now + last seen. Неудача: только visible_now = false,
/// current_target не трогаем: забывает hysteresis.
pub fn apply_scan_result(
    agent: Entity,
    result: Option<Sighting>,
    memory: &mut TargetMemory,
    now: f32,
    events: &mut EventWriter<PerceptionEvent>,
) {
    match result {
        Some(sighting) => {
            if memory.record_sighting(&sighting, now) {
                crate::log(&format!(
                    "👁️ {:?} spotted {:?} at distance {:.2}m, angle {:.1}°",
                    agent, sighting.target, sighting.distance, sighting.angle
                ));
                events.write(PerceptionEvent::TargetAcquired {
                    agent,
                    target: sighting.target,
                    position: sighting.position,
                });
            }
        }
        None => {
            if memory.record_miss() {
                crate::log(&format!("👻 {:?}: target left FOV", agent));
            }
        }
    }
}

/// Система: sensor tick (headless backend через `SpatialIndex`)
pub fn perception_tick(
    clock: Res<SimulationClock>,
    index: Res<SpatialIndex>,
    mut agents: Query<(
        Entity,
        &Transform,
        &PerceptionConfig,
        &mut PerceptionTimer,
        &mut TargetMemory,
    )>,
    mut events: EventWriter<PerceptionEvent>,
) {
    let now = clock.now();
    let delta = clock.delta();

    for (entity, transform, config, mut timer, mut memory) in agents.iter_mut() {
        if !timer.tick(delta, config.detection_interval) {
            continue;
        }

        let viewpoint = Viewpoint::from_transform(entity, transform);
        let result = scan_field_of_view(&viewpoint, config, &*index);
        apply_scan_result(entity, result, &mut memory, now, &mut events);
    }
}
