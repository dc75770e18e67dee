//! Movement компоненты: навигационные команды и обратная связь от navmesh

use bevy::prelude::*;

/// Команда движения для агента (выполняется engine NavMeshAgent)
///
/// Архитектура:
/// - AI пишет MovementCommand (high-level intent) только через `apply_navigation_goals`
/// - Engine (или `headless_navigation`) читает и ведёт агента по navmesh
/// - Обратно приходит через `NavigationState`
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Стоять на месте (не обновлять navmesh destination)
    Idle,
    /// Двигаться к позиции (world coordinates): setDestination
    MoveToPosition { target: Vec3 },
    /// Сбросить путь немедленно: resetPath
    Stop,
}

impl Default for MovementCommand {
    fn default() -> Self {
        Self::Idle
    }
}

impl MovementCommand {
    /// Есть ли активный destination
    pub fn destination(&self) -> Option<Vec3> {
        match self {
            MovementCommand::MoveToPosition { target } => Some(*target),
            MovementCommand::Idle | MovementCommand::Stop => None,
        }
    }
}

/// Состояние навигации агента (пишет engine layer)
///
/// Зеркалит поля NavMeshAgent, которые нужны search логике:
/// - `path_pending`: путь ещё считается, remaining_distance невалиден
/// - `remaining_distance`: сколько осталось до destination
/// - `on_navigable_surface`: агент стоит на navmesh (иначе запросы подавляются)
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component)]
pub struct NavigationState {
    pub path_pending: bool,
    pub remaining_distance: f32,
    pub on_navigable_surface: bool,
    /// true когда агент достиг destination (сбрасывается при новом MoveToPosition)
    pub is_target_reached: bool,
    /// Сколько destination запросов ушло в navmesh (debounce диагностика)
    pub requests_issued: u32,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            path_pending: false,
            remaining_distance: 0.0,
            on_navigable_surface: true,
            is_target_reached: true,
            requests_issued: 0,
        }
    }
}

impl NavigationState {
    /// Пришли ли в текущую точку (`!pathPending && remainingDistance <= threshold`)
    pub fn has_arrived(&self, arrival_distance: f32) -> bool {
        !self.path_pending && self.remaining_distance <= arrival_distance
    }
}

/// Скорость движения агента (метры/сек)
///
/// Используется headless навигатором; в игре: NavMeshAgent.speed
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 3.5 } // 3.5 m/s: скорость NavMeshAgent по умолчанию
    }
}
