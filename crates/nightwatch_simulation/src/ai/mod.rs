//! AI decision-making module
//!
//! Perception memory → squad relay → search/patrol → pursuit arbitration.
//! Sensor живёт в `crate::perception`, исполнение пути в `crate::navigation`.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod readout;
pub mod roster;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::{PerceptionEvent, SearchEvent};
pub use readout::PerceptionReadout;
pub use roster::{validate_rosters, SquadError};
pub use systems::{
    arbitrate_pursuit, drive_pursuit, expire_commanded_targets, relay_commander_targets,
    update_patrol_routes, update_search_episodes, update_target_memory, SEARCH_START_WINDOW,
};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate (`SimulationSet::Decision`).
/// Порядок выполнения:
/// 1. update_target_memory: hysteresis, TargetLost события
/// 2. relay_commander_targets: commander → roster
/// 3. expire_commanded_targets: окно 2 × lose_target_duration
/// 4. update_search_episodes: подписка на TargetLost, waypoints
/// 5. update_patrol_routes: idle патруль
/// 6. drive_pursuit: arbitration → NavigationGoal
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PerceptionEvent>()
            .add_event::<SearchEvent>()
            .add_systems(
                FixedUpdate,
                (
                    update_target_memory,
                    relay_commander_targets,
                    expire_commanded_targets,
                    update_search_episodes,
                    update_patrol_routes,
                    drive_pursuit,
                )
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(SimulationSet::Decision),
            );
    }
}
