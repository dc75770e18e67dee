//! Target memory: кого агент помнит и когда видел последний раз.

use bevy::prelude::*;

use crate::perception::Sighting;

/// Трёхстадийный статус памяти (hysteresis против мерцания LOS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TargetStatus {
    /// Цель видна прямо сейчас
    Active,
    /// LOS потерян, но hysteresis окно ещё не истекло: идём на last seen
    Retained,
    /// Цели нет
    Empty,
}

/// Память агента о текущей цели
///
/// Пишут только два места:
/// - sensor (`perception_tick`): visible_now + last_seen_*
/// - hysteresis (`update_target_memory`): очистка current_target
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct TargetMemory {
    /// Weak reference: entity может быть despawned, проверяем при каждом шаге
    pub current_target: Option<Entity>,
    pub last_seen_position: Vec3,
    /// None: ещё ни разу не видели
    pub last_seen_at: Option<f32>,
    pub visible_now: bool,
}

impl TargetMemory {
    pub fn status(&self, now: f32, lose_target_duration: f32) -> TargetStatus {
        if self.current_target.is_none() {
            return TargetStatus::Empty;
        }
        if self.visible_now {
            return TargetStatus::Active;
        }
        if self.time_since_last_seen(now) <= lose_target_duration {
            TargetStatus::Retained
        } else {
            TargetStatus::Empty
        }
    }

    pub fn is_active(&self) -> bool {
        self.visible_now && self.current_target.is_some()
    }

    /// Секунды с последнего наблюдения (`f32::INFINITY` если никогда)
    pub fn time_since_last_seen(&self, now: f32) -> f32 {
        self.last_seen_at
            .map(|seen| (now - seen).max(0.0))
            .unwrap_or(f32::INFINITY)
    }

    /// Истекло ли hysteresis окно (цель пора забыть)
    pub fn should_forget(&self, now: f32, lose_target_duration: f32) -> bool {
        self.current_target.is_some()
            && !self.visible_now
            && self.time_since_last_seen(now) > lose_target_duration
    }

    /// Sensor увидел цель. Возвращает true если это новое обнаружение.
    pub fn record_sighting(&mut self, sighting: &Sighting, now: f32) -> bool {
        let newly_acquired = !self.visible_now || self.current_target != Some(sighting.target);
        self.visible_now = true;
        self.current_target = Some(sighting.target);
        self.last_seen_position = sighting.position;
        self.last_seen_at = Some(now);
        newly_acquired
    }

    /// Sensor не увидел никого: цель НЕ трогаем (решает hysteresis).
    /// Возвращает true если цель только что пропала из FOV.
    pub fn record_miss(&mut self) -> bool {
        let was_visible = self.visible_now;
        self.visible_now = false;
        was_visible
    }

    /// Очистить цель (lost transition)
    pub fn forget(&mut self) -> Option<Entity> {
        self.visible_now = false;
        self.current_target.take()
    }
}
