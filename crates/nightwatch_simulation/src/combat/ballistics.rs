//! Баллистика снарядов: стартовая скорость, разброс, точка траектории.

use bevy::prelude::*;
use rand::Rng;

/// Гравитация для предсказания траектории (м/с²)
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Максимальный разброс при accuracy = 0 (метры по X/Z, половина по Y)
pub const MAX_SCATTER: f32 = 3.0;

/// Тип выстрела
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Trajectory {
    /// Прямой выстрел (угол `straight_shot_angle`)
    Straight,
    /// Навесной выстрел через препятствие (угол `arc_shot_angle`)
    Arc,
}

/// Стартовая скорость: горизонтальное направление на цель × speed·cos(angle),
/// вертикаль speed·sin(angle)
///
/// Цель ровно над/под origin: горизонтальной составляющей нет, летим вертикально.
pub fn launch_velocity(origin: Vec3, target: Vec3, speed: f32, angle_degrees: f32) -> Vec3 {
    let horizontal = Vec3::new(target.x - origin.x, 0.0, target.z - origin.z).normalize_or_zero();
    let angle = angle_degrees.to_radians();
    horizontal * speed * angle.cos() + Vec3::Y * speed * angle.sin()
}

/// Разброс точки прицеливания по accuracy (1 = идеально, 0 = максимум)
pub fn apply_scatter<R: Rng + ?Sized>(aim: Vec3, accuracy: f32, rng: &mut R) -> Vec3 {
    if accuracy >= 1.0 {
        return aim;
    }

    let max = (1.0 - accuracy.max(0.0)) * MAX_SCATTER;
    aim + Vec3::new(
        rng.gen_range(-max..=max),
        rng.gen_range(-max * 0.5..=max * 0.5),
        rng.gen_range(-max..=max),
    )
}

/// Позиция снаряда через `t` секунд полёта
pub fn trajectory_point(origin: Vec3, velocity: Vec3, gravity: Vec3, t: f32) -> Vec3 {
    origin + velocity * t + 0.5 * gravity * t * t
}
