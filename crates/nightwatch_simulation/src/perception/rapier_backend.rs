//! Rapier backend для perception queries
//!
//! Overlap sphere → `intersect_shape`, sight ray → `cast_ray`.
//! Маска категорий переводится в `CollisionGroups` filter: коллайдер
//! попадает в query, если его memberships пересекаются с маской.
//!
//! RapierPhysicsPlugin добавляет engine layer; здесь только чтение контекста.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::fov::{scan_field_of_view, PerceptionConfig, PerceptionTimer, Viewpoint};
use super::sensor::apply_scan_result;
use super::spatial::{Perceivable, SpatialHit, SpatialQuery};
use crate::ai::{PerceptionEvent, TargetMemory};
use crate::SimulationClock;

/// Eye height для коллайдеров без `Perceivable`
const DEFAULT_EYE_HEIGHT: f32 = 0.5;

fn category_filter(mask: u32) -> QueryFilter<'static> {
    QueryFilter::new()
        .exclude_sensors()
        .groups(CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask)))
}

/// `SpatialQuery` поверх Rapier scene queries
pub struct RapierSpatialQuery<'a, 'c, 'w, 's> {
    context: &'a RapierContext<'c>,
    bodies: &'a Query<'w, 's, (&'static GlobalTransform, Option<&'static Perceivable>)>,
}

impl<'a, 'c, 'w, 's> RapierSpatialQuery<'a, 'c, 'w, 's> {
    pub fn new(
        context: &'a RapierContext<'c>,
        bodies: &'a Query<'w, 's, (&'static GlobalTransform, Option<&'static Perceivable>)>,
    ) -> Self {
        Self { context, bodies }
    }
}

impl SpatialQuery for RapierSpatialQuery<'_, '_, '_, '_> {
    fn entities_within_radius(&self, position: Vec3, radius: f32, mask: u32) -> Vec<SpatialHit> {
        if radius <= 0.0 || mask == 0 {
            return Vec::new();
        }

        let shape = Collider::ball(radius);
        let mut hits = Vec::new();
        self.context.intersect_shape(
            position,
            Quat::IDENTITY,
            &*shape.raw,
            category_filter(mask),
            |entity| {
                if let Ok((transform, perceivable)) = self.bodies.get(entity) {
                    hits.push(SpatialHit {
                        entity,
                        position: transform.translation(),
                        eye_height: perceivable.map_or(DEFAULT_EYE_HEIGHT, |p| p.eye_height),
                    });
                }
                true // продолжаем перебор
            },
        );
        hits
    }

    fn is_obstructed(&self, origin: Vec3, target: Vec3, mask: u32) -> bool {
        if mask == 0 {
            return false;
        }

        let to_target = target - origin;
        let distance = to_target.length();
        if distance <= f32::EPSILON {
            return false;
        }

        self.context
            .cast_ray(origin, to_target / distance, distance, true, category_filter(mask))
            .is_some()
    }
}

/// Система: sensor tick через Rapier (вместо `rebuild_spatial_index` + `perception_tick`)
pub fn rapier_perception_tick(
    clock: Res<SimulationClock>,
    rapier: ReadRapierContext,
    bodies: Query<(&'static GlobalTransform, Option<&'static Perceivable>)>,
    mut agents: Query<(
        Entity,
        &Transform,
        &PerceptionConfig,
        &mut PerceptionTimer,
        &mut TargetMemory,
    )>,
    mut events: EventWriter<PerceptionEvent>,
) {
    let Ok(context) = rapier.single() else {
        // Physics ещё не поднят: sensor молчит, это не ошибка
        return;
    };
    let world = RapierSpatialQuery::new(&context, &bodies);

    let now = clock.now();
    let delta = clock.delta();

    for (entity, transform, config, mut timer, mut memory) in agents.iter_mut() {
        if !timer.tick(delta, config.detection_interval) {
            continue;
        }

        let viewpoint = Viewpoint::from_transform(entity, transform);
        let result = scan_field_of_view(&viewpoint, config, &world);
        apply_scan_result(entity, result, &mut memory, now, &mut events);
    }
}
