//! Engine configuration.
//!
//! Configuration is stored as RON, the same format the rest of the project
//! uses for hand-written data. Every field has a default, so an empty file
//! (`()`) is a valid configuration.

use crate::errors::{ConfigError, ConfigResult};
use schema::BattlerIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Environment variable that overrides [`EngineConfig::battle_seed`].
pub const SEED_ENV_VAR: &str = "PHASE_ENGINE_SEED";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-battle seed. A random seed is drawn when absent.
    pub battle_seed: Option<u64>,
    pub double_battle: bool,
    /// Default `tracing` filter; `RUST_LOG` wins when set.
    pub log_filter: String,
    pub overrides: Overrides,
}

/// Testing hooks that pin behaviour which is normally decided by battle state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Overrides {
    /// Explicit turn order applied to every speed-dependent decision.
    pub forced_turn_order: Option<Vec<BattlerIndex>>,
    /// Start the battle with Trick Room already active.
    pub trick_room: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            battle_seed: None,
            double_battle: false,
            log_filter: "info".to_string(),
            overrides: Overrides::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: EngineConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file and apply environment overrides on top of it.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_ron_str(&source)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `PHASE_ENGINE_SEED` if it is set.
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => self.apply_seed_override(&raw),
            Err(_) => Ok(()),
        }
    }

    fn apply_seed_override(&mut self, raw: &str) -> ConfigResult<()> {
        let seed = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidSeed(format!("{:?}: {}", raw, e)))?;
        self.battle_seed = Some(seed);
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(order) = &self.overrides.forced_turn_order {
            let mut seen = HashSet::new();
            for battler in order {
                if !seen.insert(*battler) {
                    return Err(ConfigError::InvalidForcedOrder(format!(
                        "{:?} appears more than once",
                        battler
                    )));
                }
            }
        }
        Ok(())
    }
}
