//! Общие хелперы интеграционных тестов: headless App на ручных часах.

#![allow(dead_code)]

use bevy::prelude::*;
use nightwatch_simulation::combat::{DamageDealt, EntityDied};
use nightwatch_simulation::perception::{Obstruction, Perceivable};
use nightwatch_simulation::{
    step_simulation, Agent, MovementSpeed, PerceptionEvent, ProjectileLaunched, SearchEvent,
    SimulationClock, SimulationPlugin, SimulationSet,
};

/// 60Hz шаг
pub const DT: f32 = 1.0 / 60.0;

/// App без MinimalPlugins: FixedUpdate гоняем руками через `step_simulation`
pub fn test_app(seed: u64) -> App {
    let mut app = App::new();
    app.add_plugins(SimulationPlugin::manual(seed));
    record_events::<PerceptionEvent>(&mut app);
    record_events::<SearchEvent>(&mut app);
    record_events::<ProjectileLaunched>(&mut app);
    record_events::<DamageDealt>(&mut app);
    record_events::<EntityDied>(&mut app);
    app
}

pub fn now(app: &App) -> f32 {
    app.world().resource::<SimulationClock>().now()
}

/// Шагать пока часы не дойдут до `time`
pub fn run_until(app: &mut App, time: f32) {
    while now(app) < time - 1e-4 {
        step_simulation(app, DT);
    }
}

pub fn run_for(app: &mut App, seconds: f32) {
    let until = now(app) + seconds;
    run_until(app, until);
}

/// Агент в `position`, смотрит на `look_at`
pub fn spawn_agent(app: &mut App, position: Vec3, look_at: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Agent,
            Transform::from_translation(position).looking_at(look_at, Vec3::Y),
        ))
        .id()
}

/// Агент, который не двигается (изолирует perception от навигации)
pub fn spawn_stationary_agent(app: &mut App, position: Vec3, look_at: Vec3) -> Entity {
    let agent = spawn_agent(app, position, look_at);
    app.world_mut()
        .entity_mut(agent)
        .insert(MovementSpeed { speed: 0.0 });
    agent
}

pub fn spawn_target(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Transform::from_translation(position), Perceivable::default()))
        .id()
}

pub fn spawn_wall(app: &mut App, center: Vec3, half_extents: Vec3) -> Entity {
    app.world_mut()
        .spawn((Transform::from_translation(center), Obstruction::wall(half_extents)))
        .id()
}

pub fn teleport(app: &mut App, entity: Entity, position: Vec3) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(entity) {
        transform.translation = position;
    }
}

pub fn component<T: Component + Clone>(app: &App, entity: Entity) -> T {
    app.world()
        .get::<T>(entity)
        .cloned()
        .expect("component should be present")
}

/// Все события типа `E` с начала прогона
///
/// `step_simulation` свапает буферы каждый шаг, поэтому копим сами.
#[derive(Resource)]
pub struct Recorded<E: Event>(pub Vec<E>);

impl<E: Event> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn record<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(reader.read().cloned());
}

/// Копить события `E` в конце каждого шага
pub fn record_events<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>().add_systems(
        FixedUpdate,
        record::<E>.after(SimulationSet::Locomotion),
    );
}

pub fn events<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world()
        .get_resource::<Recorded<E>>()
        .map(|recorded| recorded.0.clone())
        .unwrap_or_default()
}

/// Сколько событий `E` сейчас лежит в двойном буфере
pub fn buffered_events<E: Event>(app: &App) -> usize {
    app.world().resource::<Events<E>>().len()
}
