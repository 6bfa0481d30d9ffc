//! Simulation settings.
//!
//! The browser shell reads these as JSON from the `data-idle-config`
//! attribute on `<body>`. Every field is optional; missing fields fall back
//! to [`SimConfig::default`].
//!
//! ```json
//! { "starting_score": "2500", "tick_interval_ms": 33, "purchase_policy": "require_funds" }
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::ConfigError;

/// Score a fresh run starts with.
pub const DEFAULT_STARTING_SCORE: i64 = 10_000;

/// Period of the production timer (~60 Hz).
pub const DEFAULT_TICK_INTERVAL_MS: f64 = 16.0;

/// How `Simulation::purchase` treats a purchase the score cannot cover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchasePolicy {
    /// Subtract the price regardless; the UI is responsible for gating.
    #[default]
    Unchecked,
    /// Refuse with `SimError::Unaffordable`.
    RequireFunds,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub starting_score: Decimal,
    pub tick_interval_ms: f64,
    pub purchase_policy: PurchasePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_score: Decimal::from(DEFAULT_STARTING_SCORE),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            purchase_policy: PurchasePolicy::Unchecked,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_score.is_sign_negative() && !self.starting_score.is_zero() {
            return Err(ConfigError::Invalid(format!(
                "starting_score must not be negative (got {})",
                self.starting_score
            )));
        }
        if !self.tick_interval_ms.is_finite() || self.tick_interval_ms <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tick_interval_ms must be a positive number (got {})",
                self.tick_interval_ms
            )));
        }
        Ok(())
    }
}
