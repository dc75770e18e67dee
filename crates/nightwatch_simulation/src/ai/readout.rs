//! Readout API для внешних слоёв (combat, анимация, UI)
//!
//! Два варианта доступа:
//! - `PerceptionReadout`: SystemParam для систем
//! - свободные функции над `&World`: для engine bridge и тестов

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{PursuitMode, SearchState, TargetMemory};
use crate::SimulationClock;

#[derive(SystemParam)]
pub struct PerceptionReadout<'w, 's> {
    clock: Res<'w, SimulationClock>,
    agents: Query<
        'w,
        's,
        (
            &'static TargetMemory,
            Option<&'static SearchState>,
            Option<&'static PursuitMode>,
        ),
    >,
}

impl PerceptionReadout<'_, '_> {
    pub fn is_target_visible(&self, agent: Entity) -> bool {
        self.agents
            .get(agent)
            .is_ok_and(|(memory, _, _)| memory.is_active())
    }

    pub fn current_target(&self, agent: Entity) -> Option<Entity> {
        self.agents
            .get(agent)
            .ok()
            .and_then(|(memory, _, _)| memory.current_target)
    }

    /// `f32::INFINITY` если агент цель никогда не видел (или не агент)
    pub fn time_since_last_seen(&self, agent: Entity) -> f32 {
        self.agents
            .get(agent)
            .map_or(f32::INFINITY, |(memory, _, _)| {
                memory.time_since_last_seen(self.clock.now())
            })
    }

    pub fn is_searching(&self, agent: Entity) -> bool {
        self.agents
            .get(agent)
            .is_ok_and(|(_, search, _)| search.is_some_and(SearchState::is_searching))
    }

    pub fn pursuit_mode(&self, agent: Entity) -> Option<PursuitMode> {
        self.agents
            .get(agent)
            .ok()
            .and_then(|(_, _, mode)| mode.copied())
    }
}

pub fn is_target_visible(world: &World, agent: Entity) -> bool {
    world
        .get::<TargetMemory>(agent)
        .is_some_and(TargetMemory::is_active)
}

pub fn current_target(world: &World, agent: Entity) -> Option<Entity> {
    world
        .get::<TargetMemory>(agent)
        .and_then(|memory| memory.current_target)
}

pub fn time_since_last_seen(world: &World, agent: Entity) -> f32 {
    let now = world
        .get_resource::<SimulationClock>()
        .map_or(0.0, SimulationClock::now);
    world
        .get::<TargetMemory>(agent)
        .map_or(f32::INFINITY, |memory| memory.time_since_last_seen(now))
}

pub fn is_searching(world: &World, agent: Entity) -> bool {
    world
        .get::<SearchState>(agent)
        .is_some_and(SearchState::is_searching)
}

pub fn pursuit_mode(world: &World, agent: Entity) -> Option<PursuitMode> {
    world.get::<PursuitMode>(agent).copied()
}
