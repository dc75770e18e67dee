//! Ошибки загрузки и валидации базы архетипов.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchetypeError {
    #[error("failed to read enemy database {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse enemy database: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate enemy archetype id {0}")]
    DuplicateId(u32),

    #[error("archetype {id}: view angle {angle} outside [0, 360]")]
    InvalidViewAngle { id: u32, angle: f32 },

    #[error("archetype {id}: {field} must be non-negative, got {value}")]
    NegativeValue {
        id: u32,
        field: &'static str,
        value: f32,
    },

    #[error("archetype {id}: ranged min_range {min} exceeds max_range {max}")]
    InvalidRange { id: u32, min: f32, max: f32 },

    #[error("archetype {id}: accuracy {accuracy} outside [0, 1]")]
    InvalidAccuracy { id: u32, accuracy: f32 },

    #[error("archetype {id} commands unknown archetype {commanded}")]
    UnknownCommandedId { id: u32, commanded: u32 },

    #[error("commander roster cycle between archetypes {0:?}")]
    RosterCycle(Vec<u32>),

    #[error("unknown enemy archetype {0}")]
    UnknownArchetype(u32),
}
