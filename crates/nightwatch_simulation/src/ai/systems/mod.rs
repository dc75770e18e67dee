//! AI systems (perception memory → relay → search/patrol → pursuit)

pub mod memory;
pub mod patrol;
pub mod pursuit;
pub mod search;
pub mod squad;
pub mod waypoints;

// Re-export all systems
pub use memory::*;
pub use patrol::*;
pub use pursuit::*;
pub use search::*;
pub use squad::*;
