//! Combat module: melee и ranged по цели из perception памяти
//!
//! ECS ответственность:
//! - выбор цели (своя память / roster spotter'а)
//! - дистанция, cooldown/перезарядка, прямой или навесной выстрел
//! - Health, смерть и despawn
//! - Events: AttackLanded, ProjectileLaunched, DamageDealt, EntityDied
//!
//! Engine ответственность: спавн снаряда, физика полёта, попадания
//! (попадание снаряда приходит обратно как `AttackLanded`).

use bevy::prelude::*;

pub mod ballistics;
pub mod damage;
pub mod melee;
pub mod ranged;

#[cfg(test)]
mod ranged_tests;

// Re-export основных типов
pub use ballistics::{apply_scatter, launch_velocity, trajectory_point, Trajectory, GRAVITY};
pub use damage::{apply_damage, despawn_dead, AttackLanded, DamageDealt, EntityDied, Health};
pub use melee::{melee_engagement, MeleeAttack, MeleeCooldown};
pub use ranged::{
    ranged_engagement, rapier_ranged_engagement, FiringSolution, ProjectileLaunched,
    RangedAttack, RangedShooters, ReloadTimer,
};

use crate::perception::PerceptionBackend;
use crate::SimulationSet;

/// Combat Plugin
///
/// Бой после навигации в том же шаге (`SimulationSet::Combat`):
/// цель и память уже обновлены текущим тиком.
/// Порядок: melee + ranged → apply_damage → despawn_dead.
#[derive(Default)]
pub struct CombatPlugin {
    /// Чем проверять прямой путь выстрела
    pub backend: PerceptionBackend,
}

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProjectileLaunched>()
            .add_event::<AttackLanded>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        match self.backend {
            PerceptionBackend::Headless => {
                app.add_systems(
                    FixedUpdate,
                    (melee_engagement, ranged_engagement, apply_damage, despawn_dead)
                        .chain()
                        .in_set(SimulationSet::Combat),
                );
            }
            PerceptionBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    (melee_engagement, rapier_ranged_engagement, apply_damage, despawn_dead)
                        .chain()
                        .in_set(SimulationSet::Combat),
                );
            }
        }
    }
}
