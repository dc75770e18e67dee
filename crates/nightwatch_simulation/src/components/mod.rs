//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - agent: маркер AI агента (Required Components собирают весь набор)
//! - movement: навигация и перемещение (MovementCommand, NavigationState)
//!
//! AI/perception компоненты живут рядом со своими системами (`ai::components`, `perception`).

pub mod agent;
pub mod movement;

// Re-exports для удобного импорта
pub use agent::*;
pub use movement::*;
