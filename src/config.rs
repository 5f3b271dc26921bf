use lodestone_common::{LodestoneError, Result};
use lodestone_logger::LogSeverity;
use lodestone_world::search::{DEFAULT_MAX_DISTANCE, MAX_SEARCH_DISTANCE};
use lodestone_world::sight::DEFAULT_SAMPLES_PER_BLOCK;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunables for a [`World`](crate::World). Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub log_level: String,
    pub find_block_max_distance: i32,
    pub sight_samples_per_block: f64,
    pub overworld_dimension: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            find_block_max_distance: DEFAULT_MAX_DISTANCE,
            sight_samples_per_block: DEFAULT_SAMPLES_PER_BLOCK,
            overworld_dimension: 0,
        }
    }
}

impl WorldConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: WorldConfig =
            serde_json::from_str(json).map_err(|err| LodestoneError::ConfigError(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn severity(&self) -> Result<LogSeverity> {
        self.log_level.parse().map_err(LodestoneError::ConfigError)
    }

    /// Checks value ranges. Run by [`from_json`](Self::from_json) and
    /// [`World::new`](crate::World::new).
    pub fn validate(&self) -> Result<()> {
        self.severity()?;
        if !(0..=MAX_SEARCH_DISTANCE).contains(&self.find_block_max_distance) {
            return Err(LodestoneError::ConfigError(format!(
                "find_block_max_distance must be within 0..={}, got {}",
                MAX_SEARCH_DISTANCE, self.find_block_max_distance
            )));
        }
        if !(self.sight_samples_per_block > 0.0 && self.sight_samples_per_block.is_finite()) {
            return Err(LodestoneError::ConfigError(format!(
                "sight_samples_per_block must be positive, got {}",
                self.sight_samples_per_block
            )));
        }
        Ok(())
    }
}
