//! Engine configuration loader.

use std::path::Path;

use stats_core::StatsConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`StatsConfig::default`].
    pub fn load(path: &Path) -> LoadResult<StatsConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<StatsConfig> {
        let config: StatsConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if !config.defense_constant.is_finite() || config.defense_constant <= 0.0 {
            anyhow::bail!(
                "defense_constant must be positive and finite, got {}",
                config.defense_constant
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config = ConfigLoader::parse("regen_enabled = false\n").unwrap();
        assert!(!config.regen_enabled);
        assert_eq!(
            config.defense_constant,
            StatsConfig::DEFAULT_DEFENSE_CONSTANT
        );
    }

    #[test]
    fn rejects_non_positive_constant() {
        assert!(ConfigLoader::parse("defense_constant = 0.0\n").is_err());
        assert_eq!(
            ConfigLoader::parse("defense_constant = 250.0\n")
                .unwrap()
                .defense_constant,
            250.0
        );
    }
}
