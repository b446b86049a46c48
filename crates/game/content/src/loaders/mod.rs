//! Content loaders for reading game data from files.
//!
//! Every loader reads a whole file and returns an owned value; parse errors
//! carry the file path through `anyhow` context.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{CatalogLoader, ContentCatalog};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
