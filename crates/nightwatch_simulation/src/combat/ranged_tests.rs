//! Tests for ranged engagement and ballistics.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::ai::{SquadCommander, TargetMemory};
    use crate::combat::*;
    use crate::perception::{Obstruction, PerceptionConfig, SpatialIndex};
    use crate::{DeterministicRng, SimulationClock};

    fn setup_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimulationClock::manual());
        world.insert_resource(DeterministicRng::new(42));
        world.insert_resource(SpatialIndex::default());
        world.init_resource::<Events<ProjectileLaunched>>();
        world
    }

    fn seen(target: Entity, position: Vec3) -> TargetMemory {
        TargetMemory {
            current_target: Some(target),
            last_seen_position: position,
            last_seen_at: Some(0.0),
            visible_now: true,
        }
    }

    fn perfect_aim() -> RangedAttack {
        RangedAttack {
            accuracy: 1.0,
            ..default()
        }
    }

    fn spawn_archer(world: &mut World, target: Entity, target_position: Vec3) -> Entity {
        world
            .spawn((
                Transform::default(),
                perfect_aim(),
                seen(target, target_position),
                PerceptionConfig::default(),
            ))
            .id()
    }

    fn fire(world: &mut World) {
        world
            .run_system_once(ranged_engagement)
            .expect("ranged_engagement should run");
    }

    fn launched(world: &World) -> Vec<ProjectileLaunched> {
        world
            .resource::<Events<ProjectileLaunched>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    #[test]
    fn test_clear_path_fires_straight_shot() {
        let mut world = setup_world();
        let target_position = Vec3::new(0.0, 0.0, -10.0);
        let target = world.spawn(Transform::from_translation(target_position)).id();
        let archer = spawn_archer(&mut world, target, target_position);

        fire(&mut world);

        let shots = launched(&world);
        assert_eq!(shots.len(), 1);
        let shot = &shots[0];
        assert_eq!(shot.shooter, archer);
        assert_eq!(shot.target, target);
        assert_eq!(shot.trajectory, Trajectory::Straight);
        assert_eq!(shot.damage, RangedAttack::default().projectile_damage);
        assert_eq!(shot.origin, Vec3::new(0.0, 1.5, 0.0));
        assert_abs_diff_eq!(shot.velocity.z, -20.0, epsilon = 1e-4);
        assert_abs_diff_eq!(shot.velocity.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_obstructed_path_switches_to_arc() {
        let mut world = setup_world();
        world.resource_mut::<SpatialIndex>().insert_obstruction(
            Vec3::new(0.0, 1.0, -5.0),
            &Obstruction::wall(Vec3::new(2.0, 2.0, 0.2)),
        );
        let target_position = Vec3::new(0.0, 0.0, -10.0);
        let target = world.spawn(Transform::from_translation(target_position)).id();
        spawn_archer(&mut world, target, target_position);

        fire(&mut world);

        let shots = launched(&world);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].trajectory, Trajectory::Arc);
        let expected = 20.0 * 45.0_f32.to_radians().sin();
        assert_abs_diff_eq!(shots[0].velocity.y, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_reload_gates_next_shot() {
        let mut world = setup_world();
        let target_position = Vec3::new(0.0, 0.0, -10.0);
        let target = world.spawn(Transform::from_translation(target_position)).id();
        spawn_archer(&mut world, target, target_position);

        fire(&mut world);
        world.resource_mut::<SimulationClock>().advance(1.0);
        fire(&mut world);
        assert_eq!(launched(&world).len(), 1);

        world.resource_mut::<SimulationClock>().advance(1.0);
        fire(&mut world);
        assert_eq!(launched(&world).len(), 2);
    }

    #[test]
    fn test_target_inside_min_range_is_ignored() {
        let mut world = setup_world();
        let target_position = Vec3::new(0.0, 0.0, -2.0);
        let target = world.spawn(Transform::from_translation(target_position)).id();
        spawn_archer(&mut world, target, target_position);

        fire(&mut world);
        assert!(launched(&world).is_empty());
    }

    #[test]
    fn test_spotter_commander_fires_without_own_sight() {
        let mut world = setup_world();
        let target_position = Vec3::new(0.0, 0.0, -12.0);
        let target = world.spawn(Transform::from_translation(target_position)).id();
        let scout = world
            .spawn((Transform::default(), seen(target, target_position)))
            .id();
        let commander = world
            .spawn((
                Transform::default(),
                RangedAttack {
                    spotter_mode: true,
                    ..perfect_aim()
                },
                TargetMemory::default(),
                PerceptionConfig::default(),
                SquadCommander::new(vec![scout]),
            ))
            .id();

        fire(&mut world);

        let shots = launched(&world);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].shooter, commander);
        assert_eq!(shots[0].target, target);
    }

    #[test]
    fn test_scatter_stays_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let aim = Vec3::new(0.0, 1.0, -10.0);

        assert_eq!(apply_scatter(aim, 1.0, &mut rng), aim);

        for _ in 0..200 {
            let offset = apply_scatter(aim, 0.5, &mut rng) - aim;
            assert!(offset.x.abs() <= 1.5 && offset.z.abs() <= 1.5);
            assert!(offset.y.abs() <= 0.75);
        }
    }

    #[test]
    fn test_trajectory_point_follows_gravity() {
        let velocity = launch_velocity(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 10.0, 90.0);
        assert_abs_diff_eq!(velocity.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(velocity.y, 10.0, epsilon = 1e-4);

        let apex = trajectory_point(Vec3::ZERO, velocity, GRAVITY, 10.0 / 9.81);
        assert_abs_diff_eq!(apex.y, 100.0 / (2.0 * 9.81), epsilon = 1e-3);
    }
}
