//! Battle configuration loader.
//!
//! The TOML file only lists what it changes; everything else keeps the
//! engine defaults.

use std::path::Path;

use battle_core::{BattleConfig, MultiplierTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Optional overrides for [`BattleConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigSpec {
    pub priority_weight: Option<f64>,
    pub jitter_bound: Option<f64>,
    pub level_step_percent: Option<u32>,
    pub base_spread_percent: Option<u32>,
    pub damage_table: Option<MultiplierTable>,
    pub healing_table: Option<MultiplierTable>,
    pub shield_table: Option<MultiplierTable>,
}

impl ConfigSpec {
    pub fn apply(self, mut config: BattleConfig) -> BattleConfig {
        if let Some(weight) = self.priority_weight {
            config = config.with_priority_weight(weight);
        }
        if let Some(bound) = self.jitter_bound {
            config = config.with_jitter_bound(bound);
        }
        let tables = &mut config.roll_tables;
        if let Some(step) = self.level_step_percent {
            tables.level_step_percent = step;
        }
        if let Some(spread) = self.base_spread_percent {
            tables.base_spread_percent = spread.min(100);
        }
        if let Some(table) = self.damage_table {
            tables.damage = table;
        }
        if let Some(table) = self.healing_table {
            tables.healing = table;
        }
        if let Some(table) = self.shield_table {
            tables.shield = table;
        }
        config
    }
}

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load overrides from a TOML file and apply them to the defaults.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let spec: ConfigSpec = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(spec.apply(BattleConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), BattleConfig::default());
    }

    #[test]
    fn listed_values_override_defaults() {
        let config = ConfigLoader::parse(
            "priority_weight = 50.0\njitter_bound = 0.0\nbase_spread_percent = 250\n",
        )
        .unwrap();
        assert_eq!(config.priority_weight, 50.0);
        assert_eq!(config.jitter_bound, 0.0);
        assert_eq!(config.roll_tables.base_spread_percent, 100);
        assert_eq!(config.roll_tables.level_step_percent, 10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigLoader::parse("turn_limit = 3\n").is_err());
    }
}
