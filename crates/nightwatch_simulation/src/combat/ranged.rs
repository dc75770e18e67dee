//! Ranged engagement: лучник стреляет по цели из памяти (или цели spotter'а).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::ReadRapierContext;
use serde::{Deserialize, Serialize};

use super::ballistics::{apply_scatter, launch_velocity, Trajectory};
use crate::ai::{SquadCommander, TargetMemory, TargetStatus};
use crate::perception::{
    Perceivable, PerceptionConfig, RapierSpatialQuery, SpatialIndex, SpatialQuery,
};
use crate::{DeterministicRng, SimulationClock};

/// Параметры дальнего боя
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
#[require(ReloadTimer)]
pub struct RangedAttack {
    /// 1 = идеальный прицел, 0 = максимальный разброс
    pub accuracy: f32,
    /// Секунды между выстрелами
    pub reload_time: f32,
    pub min_range: f32,
    pub max_range: f32,
    pub projectile_speed: f32,
    /// Урон при попадании (engine пишет `AttackLanded`)
    pub projectile_damage: f32,
    /// Угол прямого выстрела (градусы, 0 = горизонтально)
    pub straight_shot_angle: f32,
    /// Угол навесного выстрела (градусы)
    pub arc_shot_angle: f32,
    /// Навесом через препятствие, если прямой путь перекрыт
    pub use_arc_when_obstructed: bool,
    /// Высота точки вылета над Transform.translation
    pub fire_point_height: f32,
    /// Куда целимся относительно позиции цели (грудь)
    pub aim_height: f32,
    /// Commander стреляет по цели, которую видит кто-то из roster (без своего LOS)
    pub spotter_mode: bool,
}

impl Default for RangedAttack {
    fn default() -> Self {
        Self {
            accuracy: 0.85,
            reload_time: 2.0,
            min_range: 3.0,
            max_range: 25.0,
            projectile_speed: 20.0,
            projectile_damage: 15.0,
            straight_shot_angle: 0.0,
            arc_shot_angle: 45.0,
            use_arc_when_obstructed: true,
            fire_point_height: 1.5,
            aim_height: 1.0,
            spotter_mode: false,
        }
    }
}

impl RangedAttack {
    pub fn in_range(&self, distance: f32) -> bool {
        distance >= self.min_range && distance <= self.max_range
    }

    pub fn launch_angle(&self, trajectory: Trajectory) -> f32 {
        match trajectory {
            Trajectory::Straight => self.straight_shot_angle,
            Trajectory::Arc => self.arc_shot_angle,
        }
    }
}

/// Время готовности следующего выстрела (секунды симуляции)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ReloadTimer {
    pub ready_at: f32,
}

/// Event: снаряд выпущен (спавн снаряда: задача engine layer)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProjectileLaunched {
    pub shooter: Entity,
    pub target: Entity,
    pub origin: Vec3,
    pub velocity: Vec3,
    pub trajectory: Trajectory,
    pub damage: f32,
}

/// Выбранная цель для выстрела
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiringSolution {
    pub target: Entity,
    pub position: Vec3,
}

#[derive(SystemParam)]
pub struct RangedShooters<'w, 's> {
    clock: Res<'w, SimulationClock>,
    rng: ResMut<'w, DeterministicRng>,
    shooters: Query<
        'w,
        's,
        (
            Entity,
            &'static Transform,
            &'static RangedAttack,
            &'static mut ReloadTimer,
            &'static TargetMemory,
            &'static PerceptionConfig,
            Option<&'static SquadCommander>,
        ),
    >,
    memories: Query<'w, 's, &'static TargetMemory>,
    positions: Query<'w, 's, &'static Transform>,
    launched: EventWriter<'w, ProjectileLaunched>,
}

impl RangedShooters<'_, '_> {
    /// Один проход стрельбы; `world` нужен для проверки прямого пути
    pub fn engage<Q: SpatialQuery + ?Sized>(&mut self, world: &Q) {
        let now = self.clock.now();

        for (shooter, transform, attack, mut reload, memory, perception, commander) in
            self.shooters.iter_mut()
        {
            if now < reload.ready_at {
                continue;
            }

            let resolve = |entity: Entity| self.positions.get(entity).ok().map(|t| t.translation);

            let spotted = commander
                .filter(|_| attack.spotter_mode)
                .and_then(|commander| spotter_target(commander, &self.memories, &resolve));
            let Some(solution) = spotted.or_else(|| {
                own_target(memory, now, perception.lose_target_duration, &resolve)
            }) else {
                continue;
            };

            let distance = transform.translation.distance(solution.position);
            if !attack.in_range(distance) {
                continue;
            }

            let origin = transform.translation + Vec3::Y * attack.fire_point_height;
            let aim = solution.position + Vec3::Y * attack.aim_height;

            let obstructed = world.is_obstructed(origin, aim, perception.obstruction_mask);
            let trajectory = if obstructed && attack.use_arc_when_obstructed {
                Trajectory::Arc
            } else {
                Trajectory::Straight
            };

            let aim = apply_scatter(aim, attack.accuracy, &mut self.rng.rng);
            let velocity = launch_velocity(
                origin,
                aim,
                attack.projectile_speed,
                attack.launch_angle(trajectory),
            );

            reload.ready_at = now + attack.reload_time;

            crate::log(&format!(
                "🏹 {:?}: fired {:?} shot at {:?} - distance {:.1}m",
                shooter, trajectory, solution.target, distance
            ));
            self.launched.write(ProjectileLaunched {
                shooter,
                target: solution.target,
                origin,
                velocity,
                trajectory,
                damage: attack.projectile_damage,
            });
        }
    }
}

/// Цель, которую прямо сейчас видит кто-то из roster'а commander'а
fn spotter_target(
    commander: &SquadCommander,
    memories: &Query<&TargetMemory>,
    resolve: &impl Fn(Entity) -> Option<Vec3>,
) -> Option<FiringSolution> {
    commander.roster.iter().find_map(|&member| {
        let memory = memories.get(member).ok().filter(|m| m.is_active())?;
        let target = memory.current_target?;
        Some(FiringSolution {
            target,
            position: resolve(target).unwrap_or(memory.last_seen_position),
        })
    })
}

/// Своя цель: Active → текущая позиция, Retained → last seen position
fn own_target(
    memory: &TargetMemory,
    now: f32,
    lose_target_duration: f32,
    resolve: &impl Fn(Entity) -> Option<Vec3>,
) -> Option<FiringSolution> {
    let target = memory.current_target?;
    let position = match memory.status(now, lose_target_duration) {
        TargetStatus::Active => resolve(target).unwrap_or(memory.last_seen_position),
        TargetStatus::Retained => memory.last_seen_position,
        TargetStatus::Empty => return None,
    };
    Some(FiringSolution { target, position })
}

/// System: стрельба (headless backend, препятствия из `SpatialIndex`)
pub fn ranged_engagement(mut shooters: RangedShooters, index: Res<SpatialIndex>) {
    shooters.engage(&*index);
}

/// System: стрельба с проверкой пути через Rapier
pub fn rapier_ranged_engagement(
    mut shooters: RangedShooters,
    rapier: ReadRapierContext,
    bodies: Query<(&'static GlobalTransform, Option<&'static Perceivable>)>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };
    shooters.engage(&RapierSpatialQuery::new(&context, &bodies));
}
