//! Enemy archetype database (JSON) и спавн агентов по архетипу
//!
//! Формат:
//! ```json
//! { "enemies": [ { "id": 1, "name": "Scout", "perception": { "view_radius": 12.0 } } ] }
//! ```
//! Все поля кроме `id` опциональны (serde default = значения по умолчанию компонентов).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

mod error;


pub use error::ArchetypeError;

use crate::ai::roster::find_roster_cycle;
use crate::ai::{PatrolConfig, PatrolRoute, SearchConfig, SquadCommander};
use crate::collision_layers::CATEGORY_ENEMY;
use crate::combat::{Health, MeleeAttack, RangedAttack};
use crate::components::{Agent, MovementSpeed};
use crate::perception::{Perceivable, PerceptionConfig};

/// Описание типа врага
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyArchetype {
    pub id: u32,
    pub name: String,
    pub perception: PerceptionConfig,
    pub search: SearchConfig,
    /// None: агент стоит на месте, пока нет цели
    pub patrol: Option<PatrolConfig>,
    pub movement_speed: f32,
    /// Архетипы, которыми командует этот враг (непустой список = commander)
    pub commanded_ids: Vec<u32>,
    /// Стартовое (и максимальное) здоровье
    pub health: f32,
    pub melee: Option<MeleeAttack>,
    pub ranged: Option<RangedAttack>,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::from("Enemy"),
            perception: PerceptionConfig::default(),
            search: SearchConfig::default(),
            patrol: None,
            movement_speed: MovementSpeed::default().speed,
            commanded_ids: Vec::new(),
            health: Health::default().max,
            melee: None,
            ranged: None,
        }
    }
}

impl EnemyArchetype {
    pub fn is_commander(&self) -> bool {
        !self.commanded_ids.is_empty()
    }

    fn validate(&self) -> Result<(), ArchetypeError> {
        let id = self.id;
        let angle = self.perception.view_angle;
        if !(0.0..=360.0).contains(&angle) {
            return Err(ArchetypeError::InvalidViewAngle { id, angle });
        }

        let mut non_negative = vec![
            ("view_radius", self.perception.view_radius),
            ("detection_interval", self.perception.detection_interval),
            ("lose_target_duration", self.perception.lose_target_duration),
            ("search_radius", self.search.search_radius),
            ("search_duration", self.search.search_duration),
            ("wait_at_point", self.search.wait_at_point),
            ("movement_speed", self.movement_speed),
            ("health", self.health),
        ];
        if let Some(patrol) = &self.patrol {
            non_negative.push(("patrol.radius", patrol.radius));
            non_negative.push(("patrol.wait_time", patrol.wait_time));
        }
        if let Some(melee) = &self.melee {
            non_negative.push(("melee.range", melee.range));
            non_negative.push(("melee.damage", melee.damage));
            non_negative.push(("melee.cooldown", melee.cooldown));
        }
        if let Some(ranged) = &self.ranged {
            non_negative.push(("ranged.reload_time", ranged.reload_time));
            non_negative.push(("ranged.projectile_damage", ranged.projectile_damage));
            non_negative.push(("ranged.min_range", ranged.min_range));
            non_negative.push(("ranged.projectile_speed", ranged.projectile_speed));
        }
        if let Some(&(field, value)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return Err(ArchetypeError::NegativeValue { id, field, value });
        }

        if let Some(ranged) = &self.ranged {
            if ranged.min_range > ranged.max_range {
                return Err(ArchetypeError::InvalidRange {
                    id,
                    min: ranged.min_range,
                    max: ranged.max_range,
                });
            }
            if !(0.0..=1.0).contains(&ranged.accuracy) {
                return Err(ArchetypeError::InvalidAccuracy {
                    id,
                    accuracy: ranged.accuracy,
                });
            }
        }

        Ok(())
    }
}

/// Resource: база архетипов врагов
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyDatabase {
    pub enemies: Vec<EnemyArchetype>,
}

impl EnemyDatabase {
    /// Разобрать JSON и провалидировать
    pub fn from_json_str(json: &str) -> Result<Self, ArchetypeError> {
        let database: Self = serde_json::from_str(json)?;
        database.validate()?;
        Ok(database)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArchetypeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ArchetypeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let database = Self::from_json_str(&json)?;
        crate::log_info(&format!(
            "Loaded {} enemy archetypes from {:?}",
            database.enemies.len(),
            path
        ));
        Ok(database)
    }

    pub fn get(&self, id: u32) -> Option<&EnemyArchetype> {
        self.enemies.iter().find(|archetype| archetype.id == id)
    }

    /// Уникальные id, валидные параметры, существующие commanded_ids, roster без циклов
    pub fn validate(&self) -> Result<(), ArchetypeError> {
        let mut ids = HashSet::new();
        for archetype in &self.enemies {
            if !ids.insert(archetype.id) {
                return Err(ArchetypeError::DuplicateId(archetype.id));
            }
        }

        for archetype in &self.enemies {
            archetype.validate()?;
            if let Some(&commanded) = archetype
                .commanded_ids
                .iter()
                .find(|commanded| !ids.contains(*commanded))
            {
                return Err(ArchetypeError::UnknownCommandedId {
                    id: archetype.id,
                    commanded,
                });
            }
        }

        let graph: HashMap<u32, Vec<u32>> = self
            .enemies
            .iter()
            .map(|archetype| (archetype.id, archetype.commanded_ids.clone()))
            .collect();
        match find_roster_cycle(&graph) {
            Some(cycle) => Err(ArchetypeError::RosterCycle(cycle)),
            None => Ok(()),
        }
    }
}

/// Marker: из какого архетипа заспавнен агент
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct EnemyKind {
    pub archetype_id: u32,
}

/// Базовый набор компонентов агента из архетипа
fn archetype_bundle(archetype: &EnemyArchetype, transform: Transform) -> impl Bundle {
    (
        Agent,
        Name::new(archetype.name.clone()),
        EnemyKind {
            archetype_id: archetype.id,
        },
        transform,
        archetype.perception.clone(),
        archetype.search.clone(),
        MovementSpeed {
            speed: archetype.movement_speed,
        },
        Health::new(archetype.health),
        Perceivable {
            categories: CATEGORY_ENEMY,
            eye_height: archetype.perception.eye_height,
        },
    )
}

/// Опциональные компоненты (patrol, melee, ranged, commander с пустым roster)
fn insert_optional(entity: &mut EntityCommands, archetype: &EnemyArchetype, home: Vec3) {
    if let Some(patrol) = &archetype.patrol {
        entity.insert((patrol.clone(), PatrolRoute::new(home)));
    }
    if let Some(melee) = &archetype.melee {
        entity.insert(melee.clone());
    }
    if let Some(ranged) = &archetype.ranged {
        entity.insert(ranged.clone());
    }
    if archetype.is_commander() {
        entity.insert(SquadCommander::default());
    }
}

/// Заспавнить одного врага
///
/// Roster commander'а остаётся пустым: отряды собирает `spawn_squad`.
pub fn spawn_enemy(
    commands: &mut Commands,
    archetype: &EnemyArchetype,
    transform: Transform,
) -> Entity {
    let mut entity = commands.spawn(archetype_bundle(archetype, transform));
    insert_optional(&mut entity, archetype, transform.translation);
    entity.id()
}

/// Точка спавна одного врага отряда
#[derive(Debug, Clone)]
pub struct SquadPlacement {
    pub archetype_id: u32,
    pub transform: Transform,
}

impl SquadPlacement {
    pub fn new(archetype_id: u32, position: Vec3) -> Self {
        Self {
            archetype_id,
            transform: Transform::from_translation(position),
        }
    }
}

/// Заспавнить отряд и связать roster'ы commander'ов по `commanded_ids`
///
/// Commander командует всеми заспавненными здесь агентами commanded архетипов.
pub fn spawn_squad(
    world: &mut World,
    database: &EnemyDatabase,
    placements: &[SquadPlacement],
) -> Result<Vec<Entity>, ArchetypeError> {
    let archetypes = placements
        .iter()
        .map(|placement| {
            database
                .get(placement.archetype_id)
                .ok_or(ArchetypeError::UnknownArchetype(placement.archetype_id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut spawned = Vec::with_capacity(placements.len());
    {
        let mut commands = world.commands();
        for (archetype, placement) in archetypes.iter().zip(placements) {
            spawned.push(spawn_enemy(&mut commands, archetype, placement.transform));
        }
    }
    world.flush();

    for (index, archetype) in archetypes.iter().enumerate() {
        if !archetype.is_commander() {
            continue;
        }

        let roster: Vec<Entity> = archetypes
            .iter()
            .zip(&spawned)
            .enumerate()
            .filter(|(other, (member, _))| {
                *other != index && archetype.commanded_ids.contains(&member.id)
            })
            .map(|(_, (_, &entity))| entity)
            .collect();

        crate::log(&format!(
            "Squad: {} {:?} commands {} agents",
            archetype.name,
            spawned[index],
            roster.len()
        ));
        world
            .entity_mut(spawned[index])
            .insert(SquadCommander::new(roster));
    }

    Ok(spawned)
}
