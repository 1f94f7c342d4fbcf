//! Planner configuration.

use std::path::Path;

use nanoscore::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Configuration consumed by the constraint enforcer and the planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfiguration {
    /// Max fraction of a position a single sell may trade (e.g., 0.28 = 28%).
    /// Disabled at `>= 1.0` or `<= 0.0`.
    pub max_sell_percentage: f64,
    /// Fixed fee per trade in EUR.
    pub transaction_cost_fixed: f64,
    /// Variable fee as a fraction of trade value.
    pub transaction_cost_percent: f64,
}

impl PlannerConfiguration {
    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: PlannerConfiguration = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config. Returns `Err` with a description if any field is nonsensical.
    pub fn validate(&self) -> Result<()> {
        if !self.max_sell_percentage.is_finite() || self.max_sell_percentage < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_sell_percentage must be >= 0 and finite, got {}",
                self.max_sell_percentage
            )));
        }
        if !self.transaction_cost_fixed.is_finite() || self.transaction_cost_fixed < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "transaction_cost_fixed must be >= 0 and finite, got {}",
                self.transaction_cost_fixed
            )));
        }
        if !self.transaction_cost_percent.is_finite()
            || self.transaction_cost_percent < 0.0
            || self.transaction_cost_percent >= 1.0
        {
            return Err(ConfigError::Invalid(format!(
                "transaction_cost_percent must be in [0, 1), got {}",
                self.transaction_cost_percent
            )));
        }
        Ok(())
    }

    /// The sell cap when it is active (`0 < pct < 1`).
    pub fn sell_cap(&self) -> Option<f64> {
        let pct = self.max_sell_percentage;
        (pct > 0.0 && pct < 1.0).then_some(pct)
    }
}

impl Default for PlannerConfiguration {
    fn default() -> Self {
        Self {
            max_sell_percentage: 1.0,
            transaction_cost_fixed: 2.0,
            transaction_cost_percent: 0.002,
        }
    }
}
