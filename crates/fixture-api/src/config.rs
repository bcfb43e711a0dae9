//! Fixture configuration
//!
//! [`FixtureConfig`] holds the tunables that are usually kept outside code:
//! seed, depth limit, null-inject probability and container bounds. It can
//! be loaded from TOML or JSON and applied to a
//! [`GenerateOptionsBuilder`](crate::options::GenerateOptionsBuilder).

use crate::arbitrary_property::DEFAULT_NULL_INJECT;
use crate::error::{FixtureError, Result};
use serde::{Deserialize, Serialize};

/// Default maximum container size
pub const DEFAULT_CONTAINER_MAX_SIZE: usize = 3;

/// Default depth at which tree materialization stops
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Fixture generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Fixed seed for reproducible samples; random when absent
    pub seed: Option<u64>,
    /// Deepest level materialized below the root
    pub max_depth: usize,
    /// Null-inject probability of nullable properties
    pub default_null_inject: f64,
    /// Upper container size bound
    pub default_container_max_size: usize,
    /// Lower container size bound
    pub default_container_min_size: usize,
}

impl FixtureConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML
    ///
    /// # Errors
    /// Returns `Config` on malformed input or invalid bounds
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(|e| FixtureError::Config(e.to_string()))?;
        config.validate()
    }

    /// Parse JSON
    ///
    /// # Errors
    /// Returns `Config` on malformed input or invalid bounds
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| FixtureError::Config(e.to_string()))?;
        config.validate()
    }

    /// With fixed seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// With depth limit
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// With null-inject probability
    #[inline]
    #[must_use]
    pub fn with_null_inject(mut self, null_inject: f64) -> Self {
        self.default_null_inject = null_inject;
        self
    }

    /// With container bounds
    #[inline]
    #[must_use]
    pub fn with_container_size(mut self, min: usize, max: usize) -> Self {
        self.default_container_min_size = min;
        self.default_container_max_size = max;
        self
    }

    fn validate(self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.default_null_inject) {
            return Err(FixtureError::Config(format!(
                "default_null_inject must be within [0, 1], got {}",
                self.default_null_inject
            )));
        }
        if self.default_container_min_size > self.default_container_max_size {
            return Err(FixtureError::Config(format!(
                "default_container_min_size {} exceeds default_container_max_size {}",
                self.default_container_min_size, self.default_container_max_size
            )));
        }
        Ok(self)
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_depth: DEFAULT_MAX_DEPTH,
            default_null_inject: DEFAULT_NULL_INJECT,
            default_container_max_size: DEFAULT_CONTAINER_MAX_SIZE,
            default_container_min_size: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn toml_overrides_defaults() {
        let config = FixtureConfig::from_toml_str(
            r"
            seed = 7
            default_container_max_size = 5
            ",
        )
        .unwrap();

        assert_eq!(config, FixtureConfig::new().with_seed(7).with_container_size(0, 5));
    }

    #[test]
    fn json_round_trip() {
        let config = FixtureConfig::new().with_max_depth(3).with_null_inject(0.5);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(FixtureConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            FixtureConfig::from_toml_str("default_null_inject = 1.5"),
            Err(FixtureError::Config(_))
        ));
        assert!(matches!(
            FixtureConfig::from_json_str(r#"{"default_container_min_size": 4, "default_container_max_size": 2}"#),
            Err(FixtureError::Config(_))
        ));
        assert!(FixtureConfig::from_toml_str("seed = \"x\"").is_err());
    }
}
