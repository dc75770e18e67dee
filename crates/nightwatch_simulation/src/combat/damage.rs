//! Health и применение урона
//!
//! Источники урона пишут `AttackLanded` (melee system здесь, попадание
//! снаряда: engine layer). `apply_damage` списывает Health и пишет
//! `DamageDealt` / `EntityDied`, `despawn_dead` убирает мёртвых.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Здоровье entity
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount.max(0.0);
    }
}

/// Событие: удар/снаряд достиг цели
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttackLanded {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
}

/// Событие: урон применён к Health
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Система: AttackLanded → Health
///
/// Цель без Health урон не получает (игрок может жить в engine layer).
/// Уже мёртвая цель повторно не умирает.
pub fn apply_damage(
    mut landed: EventReader<AttackLanded>,
    mut targets: Query<&mut Health>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
) {
    for hit in landed.read() {
        let Ok(mut health) = targets.get_mut(hit.target) else {
            crate::log(&format!("{:?}: hit target {:?} has no Health", hit.attacker, hit.target));
            continue;
        };

        let was_alive = health.is_alive();
        health.take_damage(hit.damage);
        let died = was_alive && !health.is_alive();

        damage_dealt.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            damage: hit.damage,
            target_died: died,
        });

        if died {
            crate::log_info(&format!("☠️ {:?} killed by {:?}", hit.target, hit.attacker));
            entity_died.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.attacker),
            });
        }
    }
}

/// Система: мёртвые entity удаляются из мира
///
/// Память и командные target'ы других агентов отпускают их сами
/// (despawned цель = потерянная цель).
pub fn despawn_dead(mut commands: Commands, dead: Query<(Entity, &Health)>) {
    for (entity, health) in dead.iter() {
        if !health.is_alive() {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_dies_at_zero() {
        let mut health = Health::new(30.0);
        health.take_damage(10.0);
        assert!(health.is_alive());
        assert_eq!(health.current, 20.0);

        health.take_damage(20.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut health = Health::new(30.0);
        health.take_damage(-50.0);
        assert_eq!(health.current, 30.0);
    }
}
