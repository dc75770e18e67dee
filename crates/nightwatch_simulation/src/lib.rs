//! NIGHTWATCH Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: зрение врагов, память о цели, поиск,
//! squad relay и преследование.
//!
//! ECS = strategic layer (perception state, AI decisions, ranged rules)
//! Engine = tactical layer (physics queries, navmesh, rendering): через
//! `SpatialQuery`, `WalkableSurface`, `MovementCommand` / `NavigationState`.

use bevy::ecs::event::event_update_system;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod archetype;
pub mod clock;
pub mod collision_layers;
pub mod combat;
pub mod components;
pub mod logger;
pub mod navigation;
pub mod perception;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, PerceptionEvent, PerceptionReadout, PursuitMode, SearchEvent, TargetMemory};
pub use archetype::{spawn_enemy, spawn_squad, ArchetypeError, EnemyArchetype, EnemyDatabase};
pub use clock::{advance_simulation_clock, ClockSource, SimulationClock};
pub use combat::{CombatPlugin, Health, MeleeAttack, ProjectileLaunched, RangedAttack};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use navigation::{NavigationBackend, NavigationGoal, NavigationPlugin};
pub use perception::{PerceptionBackend, PerceptionConfig, PerceptionPlugin};

/// Фазы одного симуляционного шага (FixedUpdate, строго по порядку)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Часы симуляции
    Clock,
    /// Sensor tick (spatial index + FOV scan)
    Perception,
    /// Память, relay, search/patrol, pursuit arbitration
    Decision,
    /// NavigationGoal → MovementCommand
    Navigation,
    /// Ranged engagement
    Combat,
    /// Headless исполнение движения
    Locomotion,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Debug, Clone)]
pub struct SimulationPlugin {
    pub seed: u64,
    pub clock: ClockSource,
    pub perception: PerceptionBackend,
    pub navigation: NavigationBackend,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            seed: 42,
            clock: ClockSource::FixedTime,
            perception: PerceptionBackend::Headless,
            navigation: NavigationBackend::Headless,
        }
    }
}

impl SimulationPlugin {
    /// Headless конфигурация с ручными часами (тесты, replay)
    pub fn manual(seed: u64) -> Self {
        Self {
            seed,
            clock: ClockSource::Manual,
            ..default()
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let clock = match self.clock {
            ClockSource::FixedTime => SimulationClock::default(),
            ClockSource::Manual => SimulationClock::manual(),
        };

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (search/patrol точки, разброс выстрелов)
            .insert_resource(DeterministicRng::new(self.seed))
            .insert_resource(clock)
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Clock,
                    SimulationSet::Perception,
                    SimulationSet::Decision,
                    SimulationSet::Navigation,
                    SimulationSet::Combat,
                    SimulationSet::Locomotion,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                advance_simulation_clock.in_set(SimulationSet::Clock),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((
                PerceptionPlugin {
                    backend: self.perception,
                },
                AIPlugin,
                NavigationPlugin {
                    backend: self.navigation,
                },
                CombatPlugin {
                    backend: self.perception,
                },
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (ручные часы)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin::manual(seed));

    app
}

/// Один шаг симуляции на ручных часах: сдвинуть часы и прогнать FixedUpdate
///
/// `First` не запускается, поэтому буферы событий свапаем здесь же:
/// событие живёт два шага, потом уходит (как в обычном App::update).
pub fn step_simulation(app: &mut App, delta: f32) {
    let world = app.world_mut();
    if let Some(mut clock) = world.get_resource_mut::<SimulationClock>() {
        clock.advance(delta);
    }
    world.run_schedule(FixedUpdate);

    if let Err(error) = world.run_system_cached(event_update_system) {
        log_error(&format!("event buffers not updated: {error}"));
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
