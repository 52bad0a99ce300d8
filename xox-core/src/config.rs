//! Rollout configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Parameters for estimating a position with random playouts.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloutConfig {
    /// Playouts per estimate.
    pub iterations: u32,

    /// Fixed seed for a reproducible run. A fresh seed is drawn when unset.
    pub seed: Option<u64>,

    /// Playouts between interrupt and progress checks.
    pub batch_size: u32,

    /// Seconds between progress log lines.
    pub log_interval_secs: u64,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: None,
            batch_size: 100,
            log_interval_secs: 5,
        }
    }
}

impl RolloutConfig {
    /// Create a config with the given number of iterations.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(GameError::InvalidArgument(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(GameError::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RolloutConfig::default();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_iterations() {
        let config = RolloutConfig::with_iterations(50);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn test_validate() {
        assert!(RolloutConfig::with_iterations(0).validate().is_err());
        let config = RolloutConfig {
            batch_size: 0,
            ..RolloutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: RolloutConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.iterations, 1000);

        let json = serde_json::to_string(&config).unwrap();
        let back: RolloutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
