//! Idle patrol вокруг home (самый низкий приоритет навигации).

use bevy::prelude::*;

use super::waypoints::{has_reached, sample_waypoint};
use crate::ai::{
    CommandedTarget, PatrolConfig, PatrolPhase, PatrolRoute, SearchState, TargetMemory,
    TargetStatus,
};
use crate::components::{MovementCommand, NavigationState};
use crate::navigation::WalkableSurfaceService;
use crate::perception::PerceptionConfig;
use crate::{DeterministicRng, SimulationClock};

/// System: патруль агентов без цели, команды и поиска
///
/// Любая цель/команда/search вытесняет патруль; после них агент
/// выжидает `wait_time` и выбирает новую точку вокруг home.
pub fn update_patrol_routes(
    clock: Res<SimulationClock>,
    mut agents: Query<(
        &PatrolConfig,
        &mut PatrolRoute,
        &PerceptionConfig,
        &TargetMemory,
        &CommandedTarget,
        &SearchState,
        &NavigationState,
        &MovementCommand,
    )>,
    surface: Res<WalkableSurfaceService>,
    mut rng: ResMut<DeterministicRng>,
) {
    let now = clock.now();
    let delta = clock.delta();

    for (config, mut route, perception, memory, commanded, search, nav_state, command) in
        agents.iter_mut()
    {
        let busy = memory.status(now, perception.lose_target_duration) != TargetStatus::Empty
            || commanded.is_present()
            || search.is_searching();

        if busy {
            let resume = PatrolPhase::Waiting {
                remaining: config.wait_time,
            };
            if route.phase != resume {
                route.phase = resume;
            }
            continue;
        }

        if config.radius <= 0.0 {
            continue;
        }

        match route.phase {
            PatrolPhase::Waiting { remaining } => {
                let remaining = remaining - delta;
                if remaining > 0.0 {
                    route.phase = PatrolPhase::Waiting { remaining };
                    continue;
                }

                let home = route.home;
                route.phase = match sample_waypoint(&mut rng.rng, &surface, home, config.radius) {
                    Some(waypoint) => PatrolPhase::Moving { waypoint },
                    // Повтор на следующем тике
                    None => PatrolPhase::Waiting { remaining: 0.0 },
                };
            }

            PatrolPhase::Moving { waypoint } => {
                if has_reached(nav_state, command, waypoint, config.arrival_distance) {
                    route.phase = PatrolPhase::Waiting {
                        remaining: config.wait_time,
                    };
                }
            }
        }
    }
}
