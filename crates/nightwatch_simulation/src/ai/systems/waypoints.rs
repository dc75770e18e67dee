//! Общие хелперы для search/patrol: arrival check и выбор случайной точки.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{MovementCommand, NavigationState};
use crate::navigation::{WalkableSurfaceService, REPATH_EPSILON};

/// Агент дошёл до `waypoint`
///
/// NavigationState валиден только если текущая команда ведёт именно в эту
/// точку (иначе remaining_distance относится к старому пути).
pub fn has_reached(
    nav_state: &NavigationState,
    command: &MovementCommand,
    waypoint: Vec3,
    arrival_distance: f32,
) -> bool {
    nav_state.on_navigable_surface
        && command
            .destination()
            .is_some_and(|destination| destination.distance(waypoint) <= REPATH_EPSILON)
        && nav_state.has_arrived(arrival_distance)
}

/// Равномерная точка в круге радиуса `radius` вокруг `center` (плоскость XZ)
pub fn random_point_in_disc<R: Rng + ?Sized>(rng: &mut R, center: Vec3, radius: f32) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = radius.max(0.0) * rng.gen::<f32>().sqrt();
    center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Случайная walkable точка вокруг `center` (`None`: sample не удался, повтор на следующем тике)
pub fn sample_waypoint<R: Rng + ?Sized>(
    rng: &mut R,
    surface: &WalkableSurfaceService,
    center: Vec3,
    radius: f32,
) -> Option<Vec3> {
    let candidate = random_point_in_disc(rng, center, radius);
    surface.sample(candidate, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_disc_points_stay_within_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let center = Vec3::new(10.0, 0.0, 10.0);

        for _ in 0..500 {
            let point = random_point_in_disc(&mut rng, center, 6.0);
            assert!(point.distance(center) <= 6.0 + 1e-4);
            assert_eq!(point.y, 0.0);
        }
    }

    #[test]
    fn test_arrival_requires_matching_destination() {
        let reached = NavigationState {
            path_pending: false,
            remaining_distance: 0.2,
            ..default()
        };
        let waypoint = Vec3::new(3.0, 0.0, 3.0);

        let heading_there = MovementCommand::MoveToPosition { target: waypoint };
        assert!(has_reached(&reached, &heading_there, waypoint, 0.5));

        // Старый путь в другую точку: не считается
        let elsewhere = MovementCommand::MoveToPosition { target: Vec3::ZERO };
        assert!(!has_reached(&reached, &elsewhere, waypoint, 0.5));

        let pending = NavigationState {
            path_pending: true,
            ..reached.clone()
        };
        assert!(!has_reached(&pending, &heading_there, waypoint, 0.5));
    }
}
