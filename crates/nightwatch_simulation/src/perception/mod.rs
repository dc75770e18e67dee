//! Perception: FOV + line-of-sight sensor
//!
//! Поток данных:
//! `SpatialQuery` (overlap + sight ray) → `scan_field_of_view` → `TargetMemory`
//!
//! Два backend'а spatial queries:
//! - headless: `SpatialIndex` (пересобирается из `Perceivable`/`Obstruction`)
//! - rapier: `RapierSpatialQuery` поверх bevy_rapier3d scene queries

pub mod fov;
pub mod rapier_backend;
pub mod sensor;
pub mod spatial;


pub use fov::{
    horizontal_angle_to, scan_field_of_view, PerceptionConfig, PerceptionTimer, Sighting,
    Viewpoint,
};
pub use rapier_backend::{rapier_perception_tick, RapierSpatialQuery};
pub use sensor::{apply_scan_result, perception_tick};
pub use spatial::{
    rebuild_spatial_index, Obstruction, ObstructionShape, Perceivable, SpatialHit, SpatialIndex,
    SpatialQuery,
};

use bevy::prelude::*;

use crate::SimulationSet;

/// Чем отвечать на spatial queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerceptionBackend {
    /// `SpatialIndex` из `Perceivable` + `Obstruction` (тесты, headless бинарь)
    #[default]
    Headless,
    /// bevy_rapier3d scene queries (RapierPhysicsPlugin ставит engine layer)
    Rapier,
}

/// Perception Plugin: sensor tick в `SimulationSet::Perception`
#[derive(Default)]
pub struct PerceptionPlugin {
    pub backend: PerceptionBackend,
}

impl Plugin for PerceptionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpatialIndex>();

        match self.backend {
            PerceptionBackend::Headless => {
                app.add_systems(
                    FixedUpdate,
                    (rebuild_spatial_index, perception_tick)
                        .chain()
                        .in_set(SimulationSet::Perception),
                );
            }
            PerceptionBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    rapier_perception_tick.in_set(SimulationSet::Perception),
                );
            }
        }
    }
}
