//! Field-of-view: конфиг, rate limiter и чистая функция проверки видимости.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::spatial::{SpatialHit, SpatialQuery};
use crate::collision_layers::{MASK_ENEMY_TARGETS, MASK_SIGHT_OBSTRUCTION};

/// Параметры зрения агента
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Полный угол конуса (градусы, 0..=360); тест идёт по половине
    pub view_angle: f32,
    /// Радиус обнаружения (метры)
    pub view_radius: f32,
    /// Интервал sensor тика (секунды симуляции)
    pub detection_interval: f32,
    /// Высота глаз агента над Transform.translation
    pub eye_height: f32,
    /// Hysteresis окно: сколько помним цель после потери LOS (секунды)
    pub lose_target_duration: f32,
    /// Кого ищем (см. `collision_layers`)
    pub target_mask: u32,
    /// Что блокирует взгляд
    pub obstruction_mask: u32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            view_angle: 90.0,
            view_radius: 10.0,
            detection_interval: 0.1,
            eye_height: 0.5,
            lose_target_duration: 3.0,
            target_mask: MASK_ENEMY_TARGETS,
            obstruction_mask: MASK_SIGHT_OBSTRUCTION,
        }
    }
}

impl PerceptionConfig {
    /// Конфиг без цели или с нулевым радиусом: агент слеп (не ошибка)
    pub fn can_perceive(&self) -> bool {
        self.target_mask != 0 && self.view_radius > 0.0 && self.view_angle > 0.0
    }
}

/// Rate limiter sensor'а (накопленное время с последнего scan)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PerceptionTimer {
    pub since_last_scan: f32,
}

impl PerceptionTimer {
    /// Накопить delta; true если пора делать scan
    ///
    /// Остаток переносится на следующий интервал, но не больше одного
    /// интервала (после паузы не делаем пачку scan'ов подряд).
    pub fn tick(&mut self, delta: f32, interval: f32) -> bool {
        self.since_last_scan += delta;
        if self.since_last_scan < interval {
            return false;
        }

        self.since_last_scan -= interval;
        if self.since_last_scan >= interval {
            self.since_last_scan = 0.0;
        }
        true
    }
}

/// Откуда смотрит агент
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub entity: Entity,
    pub position: Vec3,
    pub forward: Vec3,
}

impl Viewpoint {
    pub fn from_transform(entity: Entity, transform: &Transform) -> Self {
        Self {
            entity,
            position: transform.translation,
            forward: *transform.forward(),
        }
    }
}

/// Успешное наблюдение цели за scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub target: Entity,
    pub position: Vec3,
    pub distance: f32,
    pub angle: f32,
}

/// Горизонтальный угол (градусы) между forward и направлением на точку
///
/// `None` если у forward нет горизонтальной составляющей (смотрит строго
/// вверх/вниз): такой агент ничего не видит.
pub fn horizontal_angle_to(forward: Vec3, from: Vec3, to: Vec3) -> Option<f32> {
    let forward_xz = Vec3::new(forward.x, 0.0, forward.z).try_normalize()?;
    let Some(to_target_xz) = Vec3::new(to.x - from.x, 0.0, to.z - from.z).try_normalize() else {
        // Цель ровно над/под агентом: считаем по центру конуса
        return Some(0.0);
    };
    Some(forward_xz.angle_between(to_target_xz).to_degrees())
}

/// Один scan поля зрения
///
/// 1. Proximity query по target_mask в view_radius
/// 2. Угол < view_angle / 2
/// 3. Sight ray eye → eye не перекрыт obstruction_mask
///
/// Tie-break: побеждает ближайший кандидат, при равенстве: меньший entity index.
/// Sight ray кастуем только пока не найдём первого видимого (дорогой запрос).
pub fn scan_field_of_view<Q: SpatialQuery + ?Sized>(
    viewpoint: &Viewpoint,
    config: &PerceptionConfig,
    world: &Q,
) -> Option<Sighting> {
    if !config.can_perceive() {
        return None;
    }

    let half_angle = config.view_angle * 0.5;

    let mut candidates: Vec<(SpatialHit, f32, f32)> = world
        .entities_within_radius(viewpoint.position, config.view_radius, config.target_mask)
        .into_iter()
        .filter(|hit| hit.entity != viewpoint.entity)
        .filter_map(|hit| {
            let angle = horizontal_angle_to(viewpoint.forward, viewpoint.position, hit.position)?;
            (angle < half_angle).then(|| {
                let distance = viewpoint.position.distance(hit.position);
                (hit, distance, angle)
            })
        })
        .collect();

    candidates.sort_by(|(a, da, _), (b, db, _)| {
        da.total_cmp(db).then_with(|| a.entity.index().cmp(&b.entity.index()))
    });

    let eye = viewpoint.position + Vec3::Y * config.eye_height;

    candidates.into_iter().find_map(|(hit, distance, angle)| {
        let target_eye = hit.position + Vec3::Y * hit.eye_height;
        if world.is_obstructed(eye, target_eye, config.obstruction_mask) {
            return None;
        }
        Some(Sighting {
            target: hit.entity,
            position: hit.position,
            distance,
            angle,
        })
    })
}
