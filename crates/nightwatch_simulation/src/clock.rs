//! SimulationClock: единые часы для AI систем
//!
//! Все таймеры (sensor tick, hysteresis, search budget, relay expiry) читают
//! `now`/`delta` отсюда, а не из `Time` напрямую: тесты и replay двигают часы
//! вручную, игра: из `Time<Fixed>`.

use bevy::prelude::*;

/// Откуда берётся время шага
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ClockSource {
    /// Копируем `Time<Fixed>` каждый FixedUpdate тик
    #[default]
    FixedTime,
    /// Часы двигает вызывающий код через [`SimulationClock::advance`]
    Manual,
}

#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct SimulationClock {
    now: f32,
    delta: f32,
    pub source: ClockSource,
}

impl SimulationClock {
    pub fn manual() -> Self {
        Self {
            source: ClockSource::Manual,
            ..default()
        }
    }

    /// Текущее время симуляции (секунды с начала)
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Длительность последнего шага (секунды)
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Сдвинуть часы на один шаг. Отрицательные шаги игнорируются.
    pub fn advance(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        self.delta = delta;
        self.now += delta;
    }
}

/// Система: синхронизация часов с `Time<Fixed>` (только для `ClockSource::FixedTime`)
pub fn advance_simulation_clock(
    mut clock: ResMut<SimulationClock>,
    time: Option<Res<Time<Fixed>>>,
) {
    if clock.source != ClockSource::FixedTime {
        return;
    }
    let Some(time) = time else {
        return;
    };

    clock.delta = time.delta_secs();
    clock.now = time.elapsed_secs();
}
