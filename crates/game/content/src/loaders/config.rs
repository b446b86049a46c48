//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use delve_core::GameConfig;
use delve_core::level::{MAX_SIDE, MIN_SIDE};

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults, so an empty file yields
    /// `GameConfig::default()`.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(text: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let (width, height) = (config.floor_width, config.floor_height);
        if width < MIN_SIDE || height < MIN_SIDE {
            anyhow::bail!("Floor size {width}x{height} is below the minimum side of {MIN_SIDE}");
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            anyhow::bail!("Floor size {width}x{height} is above the maximum side of {MAX_SIDE}");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(ConfigLoader::parse("").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = ConfigLoader::parse(
            r#"
            default_enemy = "bat"

            [generator]
            enemies = 2
            enemy_roster = ["bat", "slime"]

            [starting_kit]
            hp = 80
            "#,
        )
        .unwrap();
        assert_eq!(config.default_enemy, "bat");
        assert_eq!(config.generator.enemies, 2);
        assert_eq!(config.generator.obstacles, 30);
        assert_eq!(config.starting_kit.hp, 80);
        assert_eq!(config.starting_kit.weapon, "wooden_sword");
    }

    #[test]
    fn tiny_floor_is_rejected() {
        let error = ConfigLoader::parse("floor_width = 4").unwrap_err();
        assert!(error.to_string().contains("below the minimum side"));
    }

    #[test]
    fn huge_floor_is_rejected() {
        let error = ConfigLoader::parse("floor_height = 70000").unwrap_err();
        assert!(error.to_string().contains("above the maximum side"));
    }
}
