//! Pursuit arbitration: память + команда + search + patrol → один NavigationGoal.

use bevy::prelude::*;

use crate::ai::{CommandedTarget, PatrolRoute, PursuitMode, SearchState, TargetMemory, TargetStatus};
use crate::combat::MeleeAttack;
use crate::navigation::NavigationGoal;
use crate::perception::PerceptionConfig;
use crate::SimulationClock;

/// Входы arbitration для одного агента
pub struct PursuitInputs<'a> {
    /// Текущая позиция агента
    pub position: Vec3,
    /// Радиус удара, если у агента есть melee
    pub melee_range: Option<f32>,
    pub status: TargetStatus,
    pub memory: &'a TargetMemory,
    pub commanded: &'a CommandedTarget,
    pub search: &'a SearchState,
    pub patrol: Option<&'a PatrolRoute>,
}

/// Приоритеты (сверху вниз):
/// 1. своя Active цель → её текущая позиция (в melee радиусе: Cancel + Attacking)
/// 2. командный target → позиция цели commander'а
/// 3. своя Retained цель → last seen position
/// 4. search эпизод → текущий waypoint
/// 5. patrol → текущий waypoint
/// 6. ничего → Cancel (сбросить путь)
///
/// `resolve_position` достаёт текущую позицию entity (None если despawned).
pub fn arbitrate_pursuit(
    inputs: &PursuitInputs,
    resolve_position: impl Fn(Entity) -> Option<Vec3>,
) -> (NavigationGoal, PursuitMode) {
    let memory = inputs.memory;

    if inputs.status == TargetStatus::Active {
        let position = memory
            .current_target
            .and_then(&resolve_position)
            .unwrap_or(memory.last_seen_position);
        let in_reach = inputs
            .melee_range
            .is_some_and(|range| inputs.position.distance(position) <= range);
        if in_reach {
            return (NavigationGoal::Cancel, PursuitMode::Attacking);
        }
        return (NavigationGoal::MoveTo(position), PursuitMode::Chasing);
    }

    if let Some(target) = inputs.commanded.target {
        let position = resolve_position(target).unwrap_or(inputs.commanded.relayed_position);
        return (NavigationGoal::MoveTo(position), PursuitMode::Commanded);
    }

    if inputs.status == TargetStatus::Retained {
        return (
            NavigationGoal::MoveTo(memory.last_seen_position),
            PursuitMode::Investigating,
        );
    }

    if inputs.search.is_searching() {
        let goal = inputs
            .search
            .destination()
            .map_or(NavigationGoal::Cancel, NavigationGoal::MoveTo);
        return (goal, PursuitMode::Searching);
    }

    if let Some(route) = inputs.patrol {
        let goal = route
            .destination()
            .map_or(NavigationGoal::Cancel, NavigationGoal::MoveTo);
        return (goal, PursuitMode::Patrolling);
    }

    (NavigationGoal::Cancel, PursuitMode::Idle)
}

/// System: пересчёт NavigationGoal + PursuitMode каждый шаг
pub fn drive_pursuit(
    clock: Res<SimulationClock>,
    mut agents: Query<(
        Entity,
        &Transform,
        &PerceptionConfig,
        Option<&MeleeAttack>,
        &TargetMemory,
        &CommandedTarget,
        &SearchState,
        Option<&PatrolRoute>,
        &mut NavigationGoal,
        &mut PursuitMode,
    )>,
    positions: Query<&Transform>,
) {
    let now = clock.now();

    for (entity, transform, config, melee, memory, commanded, search, patrol, mut goal, mut mode) in
        agents.iter_mut()
    {
        let inputs = PursuitInputs {
            position: transform.translation,
            melee_range: melee.map(|attack| attack.range),
            status: memory.status(now, config.lose_target_duration),
            memory,
            commanded,
            search,
            patrol,
        };
        let (new_goal, new_mode) = arbitrate_pursuit(&inputs, |target| {
            positions.get(target).ok().map(|transform| transform.translation)
        });

        if *goal != new_goal {
            *goal = new_goal;
        }

        if *mode != new_mode {
            crate::log(&format!("🧭 {:?}: {:?} → {:?}", entity, *mode, new_mode));
            *mode = new_mode;
        }
    }
}
