//! Content factory for building content tables and config from data files.

use std::path::{Path, PathBuf};

use delve_core::{ContentTables, GameConfig};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── catalog.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data files shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load the content catalog from `catalog.ron`.
    pub fn load_content(&self) -> LoadResult<ContentTables> {
        let path = self.data_dir.join("catalog.ron");
        CatalogLoader::load(&path)
    }

    /// Loads both files.
    pub fn load(&self) -> LoadResult<(GameConfig, ContentTables)> {
        let config = self.load_config()?;
        let content = self.load_content()?;
        tracing::info!(
            dir = %self.data_dir.display(),
            weapons = content.weapons.len(),
            enemies = content.enemies.len(),
            "content loaded"
        );
        Ok((config, content))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_directory_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path().join("absent"));
        let error = factory.load_config().unwrap_err();
        assert!(error.to_string().contains("config.toml"));
    }
}
