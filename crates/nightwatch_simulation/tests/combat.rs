//! Интеграционные тесты ближнего боя: подход, удары по cooldown, смерть цели.

mod common;

use bevy::prelude::*;
use common::*;
use nightwatch_simulation::ai::readout;
use nightwatch_simulation::combat::{DamageDealt, EntityDied, Health, MeleeAttack};
use nightwatch_simulation::{step_simulation, NavigationGoal, PerceptionEvent, PursuitMode};

fn spawn_brute(app: &mut App, position: Vec3, look_at: Vec3) -> Entity {
    let agent = spawn_agent(app, position, look_at);
    app.world_mut().entity_mut(agent).insert(MeleeAttack {
        range: 2.0,
        damage: 25.0,
        cooldown: 0.5,
    });
    agent
}

fn spawn_victim(app: &mut App, position: Vec3, health: f32) -> Entity {
    let target = spawn_target(app, position);
    app.world_mut()
        .entity_mut(target)
        .insert(Health::new(health));
    target
}

/// Шагать до первого нанесённого урона (не дольше `limit` секунд)
fn step_until_first_hit(app: &mut App, limit: f32) {
    let until = now(app) + limit;
    while events::<DamageDealt>(app).is_empty() && now(app) < until {
        step_simulation(app, DT);
    }
}

#[test]
fn brute_closes_in_and_stops_to_attack() {
    let mut app = test_app(31);
    let brute = spawn_brute(&mut app, Vec3::ZERO, Vec3::NEG_Z);
    let victim = spawn_victim(&mut app, Vec3::new(0.0, 0.0, -6.0), 100.0);

    step_until_first_hit(&mut app, 5.0);

    let hits = events::<DamageDealt>(&app);
    assert_eq!(hits.len(), 1, "brute should reach the victim within 5s");
    assert_eq!(hits[0].attacker, brute);
    assert_eq!(hits[0].target, victim);
    assert_eq!(
        readout::pursuit_mode(app.world(), brute),
        Some(PursuitMode::Attacking)
    );
    assert_eq!(component::<NavigationGoal>(&app, brute), NavigationGoal::Cancel);

    let brute_position = component::<Transform>(&app, brute).translation;
    assert!(brute_position.distance(Vec3::new(0.0, 0.0, -6.0)) <= 2.0 + 0.1);
    assert_eq!(component::<Health>(&app, victim).current, 75.0);
}

#[test]
fn strikes_follow_cooldown() {
    let mut app = test_app(32);
    spawn_brute(&mut app, Vec3::ZERO, Vec3::NEG_Z);
    let victim = spawn_victim(&mut app, Vec3::new(0.0, 0.0, -1.5), 1000.0);

    // Цель уже в радиусе: первый удар на первом sensor tick
    run_for(&mut app, 1.1);
    let first = events::<DamageDealt>(&app).len();
    assert!(first >= 2, "expected at least two hits, got {first}");

    // 0.5s cooldown, шаг 1/60: за 2s не больше 4 ударов и не меньше 3
    run_for(&mut app, 2.0);
    let total = events::<DamageDealt>(&app).len();
    assert!((first + 3..=first + 4).contains(&total), "{first} then {total} hits");
    assert_eq!(
        component::<Health>(&app, victim).current,
        1000.0 - 25.0 * total as f32
    );
}

#[test]
fn killed_target_is_despawned_and_forgotten() {
    let mut app = test_app(33);
    let brute = spawn_brute(&mut app, Vec3::ZERO, Vec3::NEG_Z);
    let victim = spawn_victim(&mut app, Vec3::new(0.0, 0.0, -1.5), 50.0);

    run_for(&mut app, 2.0);

    assert_eq!(
        events::<EntityDied>(&app),
        vec![EntityDied {
            entity: victim,
            killer: Some(brute),
        }]
    );
    let dealt = events::<DamageDealt>(&app);
    assert_eq!(dealt.len(), 2);
    assert!(dealt[1].target_died);

    assert!(app.world().get_entity(victim).is_err());
    assert_eq!(readout::current_target(app.world(), brute), None);
    assert!(events::<PerceptionEvent>(&app).iter().any(|event| matches!(
        event,
        PerceptionEvent::TargetLost { agent, target, .. } if *agent == brute && *target == victim
    )));
    assert_ne!(
        readout::pursuit_mode(app.world(), brute),
        Some(PursuitMode::Attacking)
    );
}

#[test]
fn target_without_health_is_attacked_but_survives() {
    let mut app = test_app(34);
    let brute = spawn_brute(&mut app, Vec3::ZERO, Vec3::NEG_Z);
    let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -1.5));

    run_for(&mut app, 1.0);

    // Урон без Health не применяется: engine layer сам решает
    assert!(events::<DamageDealt>(&app).is_empty());
    assert!(app.world().get_entity(target).is_ok());
    assert_eq!(readout::current_target(app.world(), brute), Some(target));
    assert_eq!(
        readout::pursuit_mode(app.world(), brute),
        Some(PursuitMode::Attacking)
    );
}
