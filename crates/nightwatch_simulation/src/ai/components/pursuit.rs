//! Pursuit компоненты: итоговый режим поведения агента.

use bevy::prelude::*;

/// Что агент делает на этом шаге (результат arbitration в `drive_pursuit`)
///
/// Режимы взаимоисключающие: Chasing и Searching никогда одновременно.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum PursuitMode {
    /// Нет цели, нет поиска
    #[default]
    Idle,
    /// Цель видна: идём к её текущей позиции
    Chasing,
    /// Цель видна и в melee радиусе: стоим и бьём
    Attacking,
    /// Идём к цели, которую видит commander
    Commanded,
    /// LOS потерян, hysteresis окно открыто: идём на last seen position
    Investigating,
    /// Search эпизод
    Searching,
    /// Idle патруль вокруг home
    Patrolling,
}

impl PursuitMode {
    /// Агент преследует цель (свою или командную)
    pub fn is_pursuing(&self) -> bool {
        matches!(
            self,
            PursuitMode::Chasing
                | PursuitMode::Attacking
                | PursuitMode::Commanded
                | PursuitMode::Investigating
        )
    }
}
