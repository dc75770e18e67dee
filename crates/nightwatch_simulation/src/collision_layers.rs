//! Perception categories: битовые маски для proximity/ray queries
//!
//! Одна и та же маска понимается обоими backend'ами:
//! - `SpatialIndex` (headless) сравнивает с `Perceivable::categories` / `Obstruction::categories`
//! - `RapierSpatialQuery` переводит в `CollisionGroups` (bit N = Group N+1)
//!
//! ## Слои:
//! - bit 0 (0b1): Reserved
//! - bit 1 (0b10): Player (цели для вражеского FOV)
//! - bit 2 (0b100): Environment (стены, препятствия: блокируют взгляд)
//! - bit 3 (0b1000): Enemies
//! - bit 4 (0b10000): Foliage (блокирует взгляд, не блокирует движение)

/// Player: основная цель вражеского FOV
pub const CATEGORY_PLAYER: u32 = 0b10;

/// Environment (walls, terrain)
pub const CATEGORY_ENVIRONMENT: u32 = 0b100;

/// Enemies (NPC агенты)
pub const CATEGORY_ENEMY: u32 = 0b1000;

/// Foliage: укрытия, которые прерывают line-of-sight
pub const CATEGORY_FOLIAGE: u32 = 0b10000;

/// Mask: что блокирует sight ray по умолчанию
pub const MASK_SIGHT_OBSTRUCTION: u32 = CATEGORY_ENVIRONMENT | CATEGORY_FOLIAGE;

/// Mask: кого враг ищет по умолчанию
pub const MASK_ENEMY_TARGETS: u32 = CATEGORY_PLAYER;
