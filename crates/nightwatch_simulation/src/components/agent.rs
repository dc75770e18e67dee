//! Agent: враг с зрением, памятью и навигацией

use bevy::prelude::*;

use crate::ai::{CommandedTarget, PursuitMode, SearchConfig, SearchState, TargetMemory};
use crate::navigation::NavigationGoal;
use crate::perception::{PerceptionConfig, PerceptionTimer};

use super::{MovementCommand, MovementSpeed, NavigationState};

/// Маркер AI агента
///
/// Автоматически добавляет perception, memory, search, relay слот и
/// навигационные компоненты через Required Components.
/// Патруль (`PatrolConfig` + `PatrolRoute`) и `SquadCommander` опциональны.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    PerceptionConfig,
    PerceptionTimer,
    TargetMemory,
    SearchConfig,
    SearchState,
    CommandedTarget,
    PursuitMode,
    NavigationGoal,
    MovementCommand,
    NavigationState,
    MovementSpeed
)]
pub struct Agent;
