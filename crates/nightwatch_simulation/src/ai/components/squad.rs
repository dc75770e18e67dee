//! Squad компоненты: commander roster и командный target подчинённых.

use bevy::prelude::*;

/// Commander: делится своей целью с roster'ом
///
/// Roster задаётся напрямую (не по близости). Ацикличность проверяется
/// на этапе конфигурации (`validate_rosters`).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SquadCommander {
    pub roster: Vec<Entity>,
    /// Команда уже отдана в текущем эпизоде (логируем только первую рассылку)
    pub has_issued_command: bool,
}

impl SquadCommander {
    pub fn new(roster: Vec<Entity>) -> Self {
        Self {
            roster,
            has_issued_command: false,
        }
    }
}

/// Командный target подчинённого (слот relay link)
///
/// Истекает через `2 × lose_target_duration` без подтверждения commander'ом,
/// независимо от собственного зрения подчинённого.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct CommandedTarget {
    pub target: Option<Entity>,
    /// Позиция цели на момент последнего relay (fallback если цель не резолвится)
    pub relayed_position: Vec3,
    pub relayed_at: f32,
    pub commander: Option<Entity>,
}

/// Множитель окна командного target относительно lose_target_duration
pub const COMMAND_EXPIRY_FACTOR: f32 = 2.0;

impl CommandedTarget {
    pub fn is_present(&self) -> bool {
        self.target.is_some()
    }

    pub fn receive(&mut self, target: Entity, position: Vec3, now: f32, commander: Entity) {
        self.target = Some(target);
        self.relayed_position = position;
        self.relayed_at = now;
        self.commander = Some(commander);
    }

    pub fn is_expired(&self, now: f32, lose_target_duration: f32) -> bool {
        self.target.is_some() && now - self.relayed_at > COMMAND_EXPIRY_FACTOR * lose_target_duration
    }

    pub fn clear(&mut self) -> Option<Entity> {
        self.commander = None;
        self.target.take()
    }
}
