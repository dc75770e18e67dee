//! Headless симуляция NIGHTWATCH
//!
//! Отряд (commander-лучник + два патрульных с melee) и игрок, гуляющий по кругу
//! вокруг стены. Печатает режимы агентов и здоровье игрока каждые 100 тиков.

use bevy::prelude::*;
use nightwatch_simulation::archetype::SquadPlacement;
use nightwatch_simulation::perception::{Obstruction, Perceivable};
use nightwatch_simulation::{
    ai::readout, create_headless_app, log_error, spawn_squad, step_simulation, EnemyDatabase,
    Health,
};

const SQUAD_JSON: &str = r#"{
    "enemies": [
        {
            "id": 1,
            "name": "Archer Captain",
            "perception": { "view_angle": 110.0, "view_radius": 12.0 },
            "commanded_ids": [2],
            "ranged": { "accuracy": 0.8, "spotter_mode": true }
        },
        {
            "id": 2,
            "name": "Sentry",
            "patrol": { "radius": 4.0, "wait_time": 1.5 },
            "health": 80.0,
            "melee": { "damage": 12.0, "cooldown": 1.2 }
        }
    ]
}"#;

const TICK: f32 = 1.0 / 60.0;

/// Игрок ходит по кругу радиуса 9м вокруг центра
#[derive(Component)]
struct Wanderer {
    angle: f32,
}

fn main() {
    let seed = 42;
    println!("Starting NIGHTWATCH headless simulation (seed: {})", seed);

    let database = match EnemyDatabase::from_json_str(SQUAD_JSON) {
        Ok(database) => database,
        Err(error) => {
            log_error(&format!("Enemy database rejected: {error}"));
            return;
        }
    };

    let mut app = create_headless_app(seed);

    let squad = match spawn_squad(
        app.world_mut(),
        &database,
        &[
            SquadPlacement::new(1, Vec3::new(0.0, 0.0, 4.0)),
            SquadPlacement::new(2, Vec3::new(-4.0, 0.0, -2.0)),
            SquadPlacement::new(2, Vec3::new(4.0, 0.0, -2.0)),
        ],
    ) {
        Ok(squad) => squad,
        Err(error) => {
            log_error(&format!("Squad spawn failed: {error}"));
            return;
        }
    };

    let world = app.world_mut();
    world.spawn((
        Transform::from_xyz(0.0, 1.0, 0.0),
        Obstruction::wall(Vec3::new(3.0, 1.0, 0.3)),
    ));
    let player = world
        .spawn((
            Transform::from_xyz(9.0, 0.0, 0.0),
            Perceivable::default(),
            Health::new(200.0),
            Wanderer { angle: 0.0 },
        ))
        .id();

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        move_player(app.world_mut(), player);
        step_simulation(&mut app, TICK);

        if tick % 100 == 0 {
            let world = app.world();
            let modes: Vec<String> = squad
                .iter()
                .map(|&agent| {
                    format!(
                        "{:?}={:?}{}",
                        agent,
                        readout::pursuit_mode(world, agent),
                        if readout::is_target_visible(world, agent) { " 👁" } else { "" }
                    )
                })
                .collect();
            let player_health = world
                .get::<Health>(player)
                .map_or(String::from("dead"), |health| format!("{:.0}", health.current));
            println!("Tick {}: {} | player hp {}", tick, modes.join(", "), player_health);
        }
    }

    println!("Simulation complete!");
}

fn move_player(world: &mut World, player: Entity) {
    let Ok(mut entity) = world.get_entity_mut(player) else {
        return;
    };
    let Some(mut wanderer) = entity.get_mut::<Wanderer>() else {
        return;
    };
    wanderer.angle += 0.4 * TICK;
    let angle = wanderer.angle;

    if let Some(mut transform) = entity.get_mut::<Transform>() {
        transform.translation = Vec3::new(angle.cos() * 9.0, 0.0, angle.sin() * 9.0);
    }
}
