//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "game_seed = 99\nhand_limit = 2").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();

        assert_eq!(config.game_seed, 99);
        assert_eq!(config.hand_limit, 2);
        assert_eq!(config.action_point_max, BattleConfig::DEFAULT_ACTION_POINT_MAX);
        assert_eq!(config.step_timings, BattleConfig::default().step_timings);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/battle.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/battle.toml"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(ConfigLoader::parse("action_point_max = \"three\"").is_err());
    }
}
