//! Patrol компоненты: блуждание вокруг дома, пока нет цели.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры idle патруля
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct PatrolConfig {
    /// Радиус вокруг home (метры)
    pub radius: f32,
    /// Пауза в каждой точке (секунды)
    pub wait_time: f32,
    pub arrival_distance: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            wait_time: 2.0,
            arrival_distance: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub enum PatrolPhase {
    /// Стоим; по истечении выбираем новую точку
    Waiting { remaining: f32 },
    Moving { waypoint: Vec3 },
}

/// Маршрут патруля агента
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    /// Центр патруля (обычно точка спавна)
    pub home: Vec3,
    pub phase: PatrolPhase,
}

impl PatrolRoute {
    pub fn new(home: Vec3) -> Self {
        Self {
            home,
            phase: PatrolPhase::Waiting { remaining: 0.0 },
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        match self.phase {
            PatrolPhase::Moving { waypoint } => Some(waypoint),
            PatrolPhase::Waiting { .. } => None,
        }
    }
}
