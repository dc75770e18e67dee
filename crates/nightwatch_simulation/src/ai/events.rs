//! AI Events: переходы perception/search/relay
//!
//! Target memory → PerceptionEvent → search (lost) / внешние слои (combat, анимация, UI)

use bevy::prelude::*;

/// Переходы памяти о цели
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PerceptionEvent {
    /// Цель попала в FOV (новое обнаружение или смена цели)
    TargetAcquired {
        agent: Entity,
        target: Entity,
        position: Vec3,
    },

    /// Hysteresis окно истекло (или цель despawned): цель забыта
    TargetLost {
        agent: Entity,
        target: Entity,
        /// Search anchor
        last_seen_position: Vec3,
        /// Время lost transition (для окна старта search)
        lost_at: f32,
    },
}

/// Жизненный цикл search эпизода
#[derive(Event, Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Started { agent: Entity, anchor: Vec3 },
    /// Цель снова в памяти: эпизод прерван
    Reacquired { agent: Entity },
    /// Бюджет search_duration исчерпан
    GaveUp { agent: Entity },
    /// Отменён извне (например, пришёл командный target)
    Cancelled { agent: Entity },
}
