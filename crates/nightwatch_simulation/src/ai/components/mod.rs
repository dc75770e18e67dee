//! AI components

pub mod memory;
pub mod patrol;
pub mod pursuit;
pub mod search;
pub mod squad;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod memory_tests;
#[cfg(test)]
mod squad_tests;

// Re-export all components
pub use memory::*;
pub use patrol::*;
pub use pursuit::*;
pub use search::*;
pub use squad::*;
