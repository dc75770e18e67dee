//! Search episodes: поиск вокруг last seen position после потери цели.

use bevy::prelude::*;

use super::waypoints::{has_reached, sample_waypoint};
use crate::ai::{
    CommandedTarget, PerceptionEvent, SearchConfig, SearchEvent, SearchPhase, SearchState,
    TargetMemory, TargetStatus,
};
use crate::components::{MovementCommand, NavigationState};
use crate::navigation::WalkableSurfaceService;
use crate::perception::PerceptionConfig;
use crate::{DeterministicRng, SimulationClock};

/// Окно реакции на lost transition (секунды)
///
/// Lost событие старше этого окна эпизод не запускает.
pub const SEARCH_START_WINDOW: f32 = 0.2;

/// System: жизненный цикл search эпизода
///
/// 1. `TargetLost` → новый эпизод (MovingToPoint(anchor)), если search включен
///    и нет командного target
/// 2. Любая фаза → Idle: reacquire, командный target, исчерпан бюджет
/// 3. MovingToPoint → (arrival) → WaitingAtPoint → (timer) → PickingPoint
///    → (walkable sample) → MovingToPoint
///
/// Destination отдаём через `SearchState::destination()`, путь ставит `drive_pursuit`.
pub fn update_search_episodes(
    clock: Res<SimulationClock>,
    mut perception_events: EventReader<PerceptionEvent>,
    mut agents: Query<(
        Entity,
        &SearchConfig,
        &PerceptionConfig,
        &TargetMemory,
        &CommandedTarget,
        &NavigationState,
        &MovementCommand,
        &mut SearchState,
    )>,
    surface: Res<WalkableSurfaceService>,
    mut rng: ResMut<DeterministicRng>,
    mut search_events: EventWriter<SearchEvent>,
) {
    let now = clock.now();
    let delta = clock.delta();

    // Агенты, начавшие эпизод в этом шаге (таймеры тикают со следующего)
    let mut started = Vec::new();

    for event in perception_events.read() {
        let PerceptionEvent::TargetLost {
            agent,
            last_seen_position,
            lost_at,
            ..
        } = event
        else {
            continue;
        };

        let Ok((_, config, perception, memory, commanded, _, _, mut search)) =
            agents.get_mut(*agent)
        else {
            continue;
        };

        if !config.enabled || now - *lost_at > SEARCH_START_WINDOW {
            continue;
        }
        if commanded.is_present() {
            // Командный target ведёт агента дальше, поиск не нужен
            continue;
        }
        if memory.status(now, perception.lose_target_duration) != TargetStatus::Empty {
            continue;
        }

        search.begin(*last_seen_position, config.search_duration);
        started.push(*agent);

        crate::log(&format!(
            "🔍 {:?}: search started at {:?} (radius {:.1}m, {:.1}s)",
            agent, last_seen_position, config.search_radius, config.search_duration
        ));
        search_events.write(SearchEvent::Started {
            agent: *agent,
            anchor: *last_seen_position,
        });
    }

    for (agent, config, perception, memory, commanded, nav_state, command, mut search) in
        agents.iter_mut()
    {
        if !search.is_searching() || started.contains(&agent) {
            continue;
        }

        if memory.status(now, perception.lose_target_duration) != TargetStatus::Empty {
            search.reset();
            crate::log(&format!("🎯 {:?}: target reacquired → search cancelled", agent));
            search_events.write(SearchEvent::Reacquired { agent });
            continue;
        }

        if commanded.is_present() {
            search.reset();
            crate::log(&format!("📣 {:?}: commanded target → search cancelled", agent));
            search_events.write(SearchEvent::Cancelled { agent });
            continue;
        }

        search.remaining_budget -= delta;
        if search.remaining_budget <= 0.0 {
            search.reset();
            crate::log(&format!(
                "🤷 {:?}: search time-out ({} failed samples) → giving up",
                agent, search.failed_samples
            ));
            search_events.write(SearchEvent::GaveUp { agent });
            continue;
        }

        step_search_phase(
            agent,
            config,
            nav_state,
            command,
            &mut search,
            delta,
            &surface,
            &mut rng,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn step_search_phase(
    agent: Entity,
    config: &SearchConfig,
    nav_state: &NavigationState,
    command: &MovementCommand,
    search: &mut SearchState,
    delta: f32,
    surface: &WalkableSurfaceService,
    rng: &mut DeterministicRng,
) {
    match search.phase {
        SearchPhase::Idle => {}

        SearchPhase::MovingToPoint { waypoint } => {
            if has_reached(nav_state, command, waypoint, config.arrival_distance) {
                if !search.reached_anchor {
                    search.reached_anchor = true;
                    crate::log(&format!("📍 {:?}: reached search anchor", agent));
                }
                search.phase = SearchPhase::WaitingAtPoint {
                    remaining: config.wait_at_point,
                };
            }
        }

        SearchPhase::WaitingAtPoint { remaining } => {
            let remaining = remaining - delta;
            if remaining > 0.0 {
                search.phase = SearchPhase::WaitingAtPoint { remaining };
                return;
            }
            search.phase = SearchPhase::PickingPoint;
            pick_next_point(search, config, surface, rng);
        }

        SearchPhase::PickingPoint => pick_next_point(search, config, surface, rng),
    }
}

/// Новая точка вокруг anchor; при неудаче остаёмся в PickingPoint
fn pick_next_point(
    search: &mut SearchState,
    config: &SearchConfig,
    surface: &WalkableSurfaceService,
    rng: &mut DeterministicRng,
) {
    match sample_waypoint(&mut rng.rng, surface, search.anchor, config.search_radius) {
        Some(waypoint) => {
            search.current_waypoint = waypoint;
            search.phase = SearchPhase::MovingToPoint { waypoint };
        }
        None => {
            search.failed_samples += 1;
        }
    }
}
