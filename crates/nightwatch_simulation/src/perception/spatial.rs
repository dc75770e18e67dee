//! Spatial queries для perception (overlap sphere + sight ray)
//!
//! `SpatialQuery`: узкий интерфейс к физике мира. Sensor знает только его.
//! Headless backend: `SpatialIndex` пересобирается каждый шаг из
//! `Perceivable` + `Obstruction` компонентов (без Rapier).
//! Rapier backend: см. `rapier_backend.rs`.

use bevy::prelude::*;

/// Результат proximity query: entity + её world position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialHit {
    pub entity: Entity,
    pub position: Vec3,
    /// Высота "глаз" цели над position (куда целится sight ray)
    pub eye_height: f32,
}

/// Интерфейс к spatial queries мира
pub trait SpatialQuery {
    /// Все entities категорий `mask` в радиусе `radius` от `position`
    fn entities_within_radius(&self, position: Vec3, radius: f32, mask: u32) -> Vec<SpatialHit>;

    /// Перекрыт ли отрезок origin → target коллайдером из `mask`
    fn is_obstructed(&self, origin: Vec3, target: Vec3, mask: u32) -> bool;
}

/// Entity, которую можно увидеть (игрок, союзники, приманки)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Perceivable {
    /// Битовая маска категорий (см. `collision_layers`)
    pub categories: u32,
    /// Высота глаз/груди над Transform.translation
    pub eye_height: f32,
}

impl Default for Perceivable {
    fn default() -> Self {
        Self {
            categories: crate::collision_layers::CATEGORY_PLAYER,
            eye_height: 0.5,
        }
    }
}

/// Форма препятствия (в headless backend без поворотов)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ObstructionShape {
    Sphere { radius: f32 },
    /// Axis-aligned box
    Cuboid { half_extents: Vec3 },
}

/// Препятствие для sight ray (стена, куст, колонна)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Obstruction {
    pub shape: ObstructionShape,
    pub categories: u32,
}

impl Obstruction {
    pub fn wall(half_extents: Vec3) -> Self {
        Self {
            shape: ObstructionShape::Cuboid { half_extents },
            categories: crate::collision_layers::CATEGORY_ENVIRONMENT,
        }
    }

    pub fn foliage(radius: f32) -> Self {
        Self {
            shape: ObstructionShape::Sphere { radius },
            categories: crate::collision_layers::CATEGORY_FOLIAGE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexedBody {
    entity: Entity,
    position: Vec3,
    categories: u32,
    eye_height: f32,
}

#[derive(Debug, Clone, Copy)]
struct IndexedObstruction {
    center: Vec3,
    shape: ObstructionShape,
    categories: u32,
}

/// Headless spatial backend (снимок мира на текущий шаг)
///
/// Линейный scan: агентов и препятствий в одной сцене десятки, не тысячи.
#[derive(Resource, Debug, Default)]
pub struct SpatialIndex {
    bodies: Vec<IndexedBody>,
    obstructions: Vec<IndexedObstruction>,
}

impl SpatialIndex {
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.obstructions.clear();
    }

    pub fn insert_body(&mut self, entity: Entity, position: Vec3, perceivable: &Perceivable) {
        self.bodies.push(IndexedBody {
            entity,
            position,
            categories: perceivable.categories,
            eye_height: perceivable.eye_height,
        });
    }

    pub fn insert_obstruction(&mut self, center: Vec3, obstruction: &Obstruction) {
        self.obstructions.push(IndexedObstruction {
            center,
            shape: obstruction.shape,
            categories: obstruction.categories,
        });
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl SpatialQuery for SpatialIndex {
    fn entities_within_radius(&self, position: Vec3, radius: f32, mask: u32) -> Vec<SpatialHit> {
        if radius <= 0.0 || mask == 0 {
            return Vec::new();
        }

        let radius_sq = radius * radius;
        self.bodies
            .iter()
            .filter(|body| body.categories & mask != 0)
            .filter(|body| body.position.distance_squared(position) <= radius_sq)
            .map(|body| SpatialHit {
                entity: body.entity,
                position: body.position,
                eye_height: body.eye_height,
            })
            .collect()
    }

    fn is_obstructed(&self, origin: Vec3, target: Vec3, mask: u32) -> bool {
        if mask == 0 {
            return false;
        }

        self.obstructions
            .iter()
            .filter(|obstruction| obstruction.categories & mask != 0)
            .any(|obstruction| match obstruction.shape {
                ObstructionShape::Sphere { radius } => {
                    segment_intersects_sphere(origin, target, obstruction.center, radius)
                }
                ObstructionShape::Cuboid { half_extents } => segment_intersects_aabb(
                    origin,
                    target,
                    obstruction.center - half_extents,
                    obstruction.center + half_extents,
                ),
            })
    }
}

/// Отрезок a→b пересекает сферу (center, radius)
pub fn segment_intersects_sphere(a: Vec3, b: Vec3, center: Vec3, radius: f32) -> bool {
    let ab = b - a;
    let length_sq = ab.length_squared();
    let t = if length_sq > f32::EPSILON {
        ((center - a).dot(ab) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = a + ab * t;
    closest.distance_squared(center) <= radius * radius
}

/// Отрезок a→b пересекает AABB [min, max] (slab method)
pub fn segment_intersects_aabb(a: Vec3, b: Vec3, min: Vec3, max: Vec3) -> bool {
    let direction = b - a;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for axis in 0..3 {
        let origin = a[axis];
        let dir = direction[axis];
        let (lo, hi) = (min[axis], max[axis]);

        if dir.abs() < f32::EPSILON {
            // Параллельно slab: должны быть внутри
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }

    true
}

/// Система: пересборка `SpatialIndex` из ECS (headless backend)
pub fn rebuild_spatial_index(
    mut index: ResMut<SpatialIndex>,
    bodies: Query<(Entity, &Transform, &Perceivable)>,
    obstructions: Query<(&Transform, &Obstruction)>,
) {
    index.clear();

    for (entity, transform, perceivable) in bodies.iter() {
        index.insert_body(entity, transform.translation, perceivable);
    }

    for (transform, obstruction) in obstructions.iter() {
        index.insert_obstruction(transform.translation, obstruction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision_layers::*;

    fn index_with_wall() -> SpatialIndex {
        let mut index = SpatialIndex::default();
        index.insert_obstruction(
            Vec3::new(0.0, 1.0, -3.0),
            &Obstruction::wall(Vec3::new(2.0, 1.0, 0.2)),
        );
        index
    }

    #[test]
    fn test_wall_blocks_segment_through_it() {
        let index = index_with_wall();
        let blocked = index.is_obstructed(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(0.0, 0.5, -6.0),
            MASK_SIGHT_OBSTRUCTION,
        );
        assert!(blocked);
    }

    #[test]
    fn test_segment_passing_beside_wall_is_clear() {
        let index = index_with_wall();
        let blocked = index.is_obstructed(
            Vec3::new(4.0, 0.5, 0.0),
            Vec3::new(4.0, 0.5, -6.0),
            MASK_SIGHT_OBSTRUCTION,
        );
        assert!(!blocked);
    }

    #[test]
    fn test_mask_filters_obstructions() {
        let index = index_with_wall();
        // Только foliage: стена не считается
        let blocked = index.is_obstructed(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(0.0, 0.5, -6.0),
            CATEGORY_FOLIAGE,
        );
        assert!(!blocked);
    }

    #[test]
    fn test_segment_stopping_before_sphere_is_clear() {
        assert!(!segment_intersects_sphere(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(0.0, 0.0, -4.0),
            1.0,
        ));
        assert!(segment_intersects_sphere(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.3, 0.0, -4.0),
            1.0,
        ));
    }

    #[test]
    fn test_proximity_respects_radius_and_category() {
        let mut index = SpatialIndex::default();
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        let ally = Entity::from_raw(3);

        index.insert_body(near, Vec3::new(0.0, 0.0, -4.0), &Perceivable::default());
        index.insert_body(far, Vec3::new(0.0, 0.0, -12.0), &Perceivable::default());
        index.insert_body(
            ally,
            Vec3::new(1.0, 0.0, 0.0),
            &Perceivable {
                categories: CATEGORY_ENEMY,
                eye_height: 0.5,
            },
        );

        let hits = index.entities_within_radius(Vec3::ZERO, 10.0, MASK_ENEMY_TARGETS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, near);

        assert!(index.entities_within_radius(Vec3::ZERO, 0.0, MASK_ENEMY_TARGETS).is_empty());
        assert!(index.entities_within_radius(Vec3::ZERO, 10.0, 0).is_empty());
    }
}
