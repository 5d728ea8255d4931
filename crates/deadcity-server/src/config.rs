//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! [costs]
//! MOVE = 1
//! SEARCH = 2
//!
//! [sweep]
//! interval_secs = 60
//! active_window_hours = 24
//! batch_size = 50
//! ```
//!
//! Every field is optional; missing ones take the defaults below.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use deadcity_logic::action_costs::{ActionKind, CostTable};
use deadcity_logic::constants::MILLIS_PER_HOUR;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown action type in [costs]: {0}")]
    UnknownAction(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub interval_secs: u64,
    /// Only characters active this recently are swept.
    pub active_window_hours: u64,
    pub batch_size: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            active_window_hours: 24,
            batch_size: 50,
        }
    }
}

impl SweepConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn active_window_ms(&self) -> u64 {
        self.active_window_hours.saturating_mul(MILLIS_PER_HOUR)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base cost overrides keyed by action name (`MOVE`, `SEARCH`, ...).
    pub costs: BTreeMap<String, u32>,
    pub sweep: SweepConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.interval_secs == 0 {
            return Err(ConfigError::Invalid("sweep.interval_secs must be > 0".into()));
        }
        if self.sweep.batch_size == 0 {
            return Err(ConfigError::Invalid("sweep.batch_size must be > 0".into()));
        }
        self.cost_table().map(|_| ())
    }

    /// Default costs with the `[costs]` overrides applied.
    pub fn cost_table(&self) -> Result<CostTable, ConfigError> {
        let mut table = CostTable::default();
        for (name, &cost) in &self.costs {
            let kind =
                ActionKind::parse(name).ok_or_else(|| ConfigError::UnknownAction(name.clone()))?;
            table.set(kind, cost);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.sweep.interval(), Duration::from_secs(60));
        assert_eq!(config.sweep.active_window_ms(), 24 * MILLIS_PER_HOUR);
    }

    #[test]
    fn test_cost_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            [costs]
            MOVE = 2
            SEARCH = 3

            [sweep]
            batch_size = 10
            "#,
        )
        .unwrap();
        let table = config.cost_table().unwrap();
        assert_eq!(table.base_cost(ActionKind::Move), 2);
        assert_eq!(table.base_cost(ActionKind::Search), 3);
        assert_eq!(table.base_cost(ActionKind::EnterBuilding), 1);
        assert_eq!(config.sweep.batch_size, 10);
        assert_eq!(config.sweep.interval_secs, 60);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = EngineConfig::from_toml_str("[costs]\nDANCE = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAction(ref n) if n == "DANCE"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = EngineConfig::from_toml_str("[sweep]\ninterval_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = EngineConfig::from_toml_str("[sweep]\nbatch_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("[costs\nMOVE = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
