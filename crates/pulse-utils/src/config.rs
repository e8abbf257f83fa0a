//! Configuration management utilities

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "MarketPulse AI".to_string(),
            environment: "development".to_string(),
            log_filter: crate::logging::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Build from defaults, overridden by `PULSE_ENV` and `PULSE_LOG`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_name: defaults.app_name,
            environment: first_env(&["PULSE_ENV"]).unwrap_or(defaults.environment),
            log_filter: first_env(&["PULSE_LOG"]).unwrap_or(defaults.log_filter),
        }
    }
}

/// Return the first of `keys` that is set to a non-blank value
pub fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "MarketPulse AI");
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_first_env_skips_missing_and_blank() {
        // SAFETY: test-only env mutation on keys no other test touches
        unsafe {
            std::env::remove_var("PULSE_TEST_MISSING");
            std::env::set_var("PULSE_TEST_BLANK", "  ");
            std::env::set_var("PULSE_TEST_SET", "value");
        }
        let found = first_env(&["PULSE_TEST_MISSING", "PULSE_TEST_BLANK", "PULSE_TEST_SET"]);
        assert_eq!(found.as_deref(), Some("value"));
        assert_eq!(first_env(&["PULSE_TEST_MISSING"]), None);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            environment: "prod".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.environment, "prod");
    }
}
