//! Melee: удар по видимой цели в радиусе атаки с cooldown.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::damage::AttackLanded;
use crate::ai::TargetMemory;
use crate::SimulationClock;

/// Параметры ближнего боя
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
#[require(MeleeCooldown)]
pub struct MeleeAttack {
    /// Дистанция удара (метры, между позициями)
    pub range: f32,
    pub damage: f32,
    /// Секунды между ударами
    pub cooldown: f32,
}

impl Default for MeleeAttack {
    fn default() -> Self {
        Self {
            range: 2.0,
            damage: 10.0,
            cooldown: 1.0,
        }
    }
}

impl MeleeAttack {
    pub fn in_reach(&self, distance: f32) -> bool {
        distance <= self.range
    }
}

/// Когда можно бить снова; первый удар без ожидания
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct MeleeCooldown {
    pub ready_at: f32,
}

/// System: удар по своей Active цели
///
/// Только по видимой цели (Retained не бьём), дистанция по текущей позиции цели.
pub fn melee_engagement(
    clock: Res<SimulationClock>,
    mut attackers: Query<(
        Entity,
        &Transform,
        &MeleeAttack,
        &mut MeleeCooldown,
        &TargetMemory,
    )>,
    positions: Query<&Transform>,
    mut landed: EventWriter<AttackLanded>,
) {
    let now = clock.now();

    for (attacker, transform, attack, mut cooldown, memory) in attackers.iter_mut() {
        if now < cooldown.ready_at || !memory.is_active() {
            continue;
        }
        let Some(target) = memory.current_target else {
            continue;
        };
        let Ok(target_transform) = positions.get(target) else {
            continue;
        };

        let distance = transform.translation.distance(target_transform.translation);
        if !attack.in_reach(distance) {
            continue;
        }

        cooldown.ready_at = now + attack.cooldown;
        crate::log(&format!(
            "🗡️ {:?}: attacking {:?} for {:.1} damage",
            attacker, target, attack.damage
        ));
        landed.write(AttackLanded {
            attacker,
            target,
            damage: attack.damage,
        });
    }
}
