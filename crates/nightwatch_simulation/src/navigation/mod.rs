//! Navigation: граница между AI и navmesh
//!
//! AI никогда не пишет `MovementCommand` напрямую:
//! 1. `drive_pursuit` кладёт желаемый `NavigationGoal` (пересчитывается каждый шаг)
//! 2. `apply_navigation_goals` превращает его в `MovementCommand` с debounce
//!    и подавлением запросов вне navmesh
//! 3. Engine (или `headless_navigation`) исполняет команду и пишет `NavigationState`
//!
//! Так как goal пересчитывается каждый шаг, агент, вернувшийся на navmesh,
//! автоматически получает актуальный destination.

use bevy::prelude::*;

use crate::components::{MovementCommand, MovementSpeed, NavigationState};
use crate::SimulationSet;

pub mod walkable;

pub use walkable::{FlatGround, NoWalkableSurface, WalkableSurface, WalkableSurfaceService};

/// Минимальный сдвиг destination для повторного запроса пути (метры)
pub const REPATH_EPSILON: f32 = 0.1;

/// Желаемая навигация агента на текущий шаг
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum NavigationGoal {
    /// Не трогаем текущую команду (ждём в точке)
    #[default]
    Hold,
    /// setDestination
    MoveTo(Vec3),
    /// resetPath
    Cancel,
}

/// Кто исполняет `MovementCommand`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationBackend {
    /// `headless_navigation`: прямая линия, без navmesh
    #[default]
    Headless,
    /// Engine layer (NavMeshAgent / NavigationAgent3D) читает команды сам
    External,
}

/// Navigation Plugin
///
/// `apply_navigation_goals` в `SimulationSet::Navigation`,
/// `headless_navigation` в `SimulationSet::Locomotion` (после combat).
#[derive(Default)]
pub struct NavigationPlugin {
    pub backend: NavigationBackend,
}

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WalkableSurfaceService>()
            .add_systems(
                FixedUpdate,
                apply_navigation_goals.in_set(SimulationSet::Navigation),
            );

        if self.backend == NavigationBackend::Headless {
            app.add_systems(
                FixedUpdate,
                headless_navigation.in_set(SimulationSet::Locomotion),
            );
        }
    }
}

/// Система: NavigationGoal → MovementCommand
///
/// Не более одного запроса на шаг; одинаковый destination повторно не шлём.
pub fn apply_navigation_goals(
    mut agents: Query<(
        Entity,
        &NavigationGoal,
        &mut MovementCommand,
        &mut NavigationState,
    )>,
) {
    for (entity, goal, mut command, mut nav_state) in agents.iter_mut() {
        if !nav_state.on_navigable_surface {
            // Вне navmesh: запросы подавлены, goal пересчитается на следующем шаге
            continue;
        }

        match goal {
            NavigationGoal::Hold => {}

            NavigationGoal::MoveTo(target) => {
                let same_destination = matches!(
                    *command,
                    MovementCommand::MoveToPosition { target: t } if t.distance(*target) <= REPATH_EPSILON
                );
                if same_destination {
                    continue;
                }

                *command = MovementCommand::MoveToPosition { target: *target };
                nav_state.path_pending = true;
                nav_state.is_target_reached = false;
                nav_state.requests_issued += 1;
            }

            NavigationGoal::Cancel => {
                if matches!(*command, MovementCommand::MoveToPosition { .. }) {
                    crate::log(&format!("🛑 {:?}: path reset", entity));
                    *command = MovementCommand::Stop;
                    nav_state.path_pending = false;
                    nav_state.remaining_distance = 0.0;
                }
            }
        }
    }
}

/// Система: headless navmesh (прямая линия к destination)
///
/// Используется когда engine layer не подключен (тесты, headless бинарь).
/// Path считается за один шаг: в шаге запроса `path_pending == true`,
/// на следующем: уже едем и remaining_distance валиден.
pub fn headless_navigation(
    mut agents: Query<(
        &mut Transform,
        &mut MovementCommand,
        &mut NavigationState,
        &MovementSpeed,
    )>,
    clock: Res<crate::SimulationClock>,
) {
    let delta = clock.delta();

    for (mut transform, mut command, mut nav_state, speed) in agents.iter_mut() {
        match *command {
            MovementCommand::MoveToPosition { target } => {
                if nav_state.path_pending {
                    nav_state.path_pending = false;
                    nav_state.remaining_distance = horizontal_distance(transform.translation, target);
                    continue;
                }

                let to_target = Vec3::new(
                    target.x - transform.translation.x,
                    0.0,
                    target.z - transform.translation.z,
                );
                let distance = to_target.length();
                let step = speed.speed * delta;

                if distance <= step {
                    transform.translation.x = target.x;
                    transform.translation.z = target.z;
                    nav_state.remaining_distance = 0.0;
                    nav_state.is_target_reached = true;
                } else {
                    let direction = to_target / distance;
                    transform.translation += direction * step;
                    nav_state.remaining_distance = distance - step;
                    // Смотрим по направлению движения (как NavMeshAgent.updateRotation)
                    let look_at = transform.translation + direction;
                    transform.look_at(look_at, Vec3::Y);
                }
            }

            MovementCommand::Stop => {
                nav_state.path_pending = false;
                nav_state.remaining_distance = 0.0;
                *command = MovementCommand::Idle;
            }

            MovementCommand::Idle => {}
        }
    }
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_default_is_hold() {
        assert_eq!(NavigationGoal::default(), NavigationGoal::Hold);
    }

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let a = Vec3::new(0.0, 5.0, 0.0);
        let b = Vec3::new(3.0, 0.0, 4.0);
        assert_eq!(horizontal_distance(a, b), 5.0);
    }
}
