//! Roster validation: commander → subordinate граф должен быть ацикличным.

use std::collections::HashMap;
use std::hash::Hash;

use bevy::prelude::*;
use thiserror::Error;

use super::SquadCommander;

#[derive(Debug, Error, PartialEq)]
pub enum SquadError {
    #[error("commander {commander:?} lists itself in its roster")]
    SelfCommand { commander: Entity },

    #[error("commander roster cycle: {cycle:?}")]
    RosterCycle { cycle: Vec<Entity> },
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    InProgress,
    Done,
}

/// Первый найденный цикл в графе `node → children` (None если граф ацикличен)
///
/// Обход в порядке сортировки ключей, результат детерминирован.
/// Цикл возвращается как путь, начинающийся и заканчивающийся одним узлом.
pub fn find_roster_cycle<K>(graph: &HashMap<K, Vec<K>>) -> Option<Vec<K>>
where
    K: Copy + Eq + Hash + Ord,
{
    let mut roots: Vec<K> = graph.keys().copied().collect();
    roots.sort();

    let mut visits: HashMap<K, Visit> = HashMap::new();
    let mut path = Vec::new();

    for root in roots {
        if let Some(cycle) = visit(root, graph, &mut visits, &mut path) {
            return Some(cycle);
        }
    }
    None
}

fn visit<K>(
    node: K,
    graph: &HashMap<K, Vec<K>>,
    visits: &mut HashMap<K, Visit>,
    path: &mut Vec<K>,
) -> Option<Vec<K>>
where
    K: Copy + Eq + Hash + Ord,
{
    match visits.get(&node) {
        Some(Visit::Done) => return None,
        Some(Visit::InProgress) => {
            let start = path.iter().position(|&n| n == node).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(node);
            return Some(cycle);
        }
        None => {}
    }

    visits.insert(node, Visit::InProgress);
    path.push(node);

    for &child in graph.get(&node).map(Vec::as_slice).unwrap_or_default() {
        if let Some(cycle) = visit(child, graph, visits, path) {
            return Some(cycle);
        }
    }

    path.pop();
    visits.insert(node, Visit::Done);
    None
}

/// Проверить все `SquadCommander` в мире (вызывать после спавна отряда)
pub fn validate_rosters(world: &mut World) -> Result<(), SquadError> {
    let mut query = world.query::<(Entity, &SquadCommander)>();
    let graph: HashMap<Entity, Vec<Entity>> = query
        .iter(world)
        .map(|(entity, commander)| (entity, commander.roster.clone()))
        .collect();

    let mut commanders: Vec<Entity> = graph.keys().copied().collect();
    commanders.sort();
    if let Some(&commander) = commanders
        .iter()
        .find(|&&commander| graph[&commander].contains(&commander))
    {
        return Err(SquadError::SelfCommand { commander });
    }

    match find_roster_cycle(&graph) {
        Some(cycle) => Err(SquadError::RosterCycle { cycle }),
        None => Ok(()),
    }
}
