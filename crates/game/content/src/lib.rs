//! Data-driven content definitions and loaders.
//!
//! This crate turns data files into the values `delve-core` consumes:
//! - Content catalogs (weapons, armor, items, statuses, skills, enemies and
//!   attribute tables) from RON into [`delve_core::ContentTables`]
//! - Game configuration (floor size, generator counts, starting kit, loot)
//!   from TOML into [`delve_core::GameConfig`]
//!
//! Content is read once at startup and never appears in actor snapshots
//! except as ids.

pub mod loaders;

pub use loaders::{CatalogLoader, ConfigLoader, ContentCatalog, ContentFactory, LoadResult};
