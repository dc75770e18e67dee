//! Search компоненты: конфиг и state machine эпизода поиска.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры поиска после потери цели
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct SearchConfig {
    /// Выключенный search: после потери цели агент просто останавливается
    pub enabled: bool,
    /// Радиус вокруг anchor для случайных точек (метры)
    pub search_radius: f32,
    /// Сколько ищем до того как сдаться (секунды)
    pub search_duration: f32,
    /// Пауза в каждой точке (секунды)
    pub wait_at_point: f32,
    /// Дистанция "дошли" (метры)
    pub arrival_distance: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_radius: 6.0,
            search_duration: 8.0,
            wait_at_point: 1.5,
            arrival_distance: 0.5,
        }
    }
}

/// Фазы эпизода поиска
#[derive(Debug, Clone, PartialEq, Reflect)]
pub enum SearchPhase {
    /// Не ищем
    Idle,
    /// Идём к точке (первая точка: сам anchor)
    MovingToPoint { waypoint: Vec3 },
    /// Стоим в точке, осматриваемся
    WaitingAtPoint { remaining: f32 },
    /// Выбираем следующую точку (повтор каждый тик при неудачном sample)
    PickingPoint,
}

/// Состояние search эпизода агента
///
/// Инвариант: anchor фиксирован на весь эпизод, все waypoints семплируются от него.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SearchState {
    pub phase: SearchPhase,
    /// Last seen position на момент потери цели
    pub anchor: Vec3,
    /// Оставшийся бюджет времени (секунды)
    pub remaining_budget: f32,
    pub current_waypoint: Vec3,
    pub reached_anchor: bool,
    /// Неудачные walkable samples за эпизод (диагностика)
    pub failed_samples: u32,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            phase: SearchPhase::Idle,
            anchor: Vec3::ZERO,
            remaining_budget: 0.0,
            current_waypoint: Vec3::ZERO,
            reached_anchor: false,
            failed_samples: 0,
        }
    }
}

impl SearchState {
    pub fn is_searching(&self) -> bool {
        !matches!(self.phase, SearchPhase::Idle)
    }

    /// Новый эпизод: сначала идём в сам anchor
    pub fn begin(&mut self, anchor: Vec3, search_duration: f32) {
        *self = Self {
            phase: SearchPhase::MovingToPoint { waypoint: anchor },
            anchor,
            remaining_budget: search_duration,
            current_waypoint: anchor,
            reached_anchor: false,
            failed_samples: 0,
        };
    }

    /// Эпизод окончен (reacquired / time-out / cancel)
    pub fn reset(&mut self) {
        self.phase = SearchPhase::Idle;
        self.remaining_budget = 0.0;
        self.reached_anchor = false;
    }

    /// Куда сейчас должен идти агент (None: стоим на месте / ждём)
    pub fn destination(&self) -> Option<Vec3> {
        match self.phase {
            SearchPhase::MovingToPoint { waypoint } => Some(waypoint),
            SearchPhase::Idle | SearchPhase::WaitingAtPoint { .. } | SearchPhase::PickingPoint => {
                None
            }
        }
    }
}
