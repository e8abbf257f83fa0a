//! Configuration for market analysis operations

use crate::error::{AnalysisError, Result};
use crate::model::MarketSector;
use std::time::Duration;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Query used when the user has not searched for anything
pub const DEFAULT_QUERY: &str = "major global markets";

/// Configuration for market analysis operations
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Query used when none is given
    pub default_query: String,

    /// Sectors the prompt asks about
    pub sectors: Vec<MarketSector>,

    /// Maximum number of sources shown in the dashboard
    pub max_sources: usize,

    /// HTTP request timeout
    pub request_timeout: Duration,

    /// Optional sampling temperature
    pub temperature: Option<f32>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            default_query: DEFAULT_QUERY.to_string(),
            sectors: MarketSector::ALL.to_vec(),
            max_sources: 10,
            request_timeout: Duration::from_secs(120),
            temperature: None,
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AnalysisError::Config("model must not be empty".to_string()));
        }

        if self.sectors.is_empty() {
            return Err(AnalysisError::Config(
                "at least one sector is required".to_string(),
            ));
        }

        if self.max_sources == 0 {
            return Err(AnalysisError::Config(
                "max_sources must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.as_secs() == 0 {
            return Err(AnalysisError::Config(
                "request_timeout must be at least one second".to_string(),
            ));
        }

        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(AnalysisError::Config(format!(
                    "temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }

        Ok(())
    }

    /// Query to send for an optional user query; blank means default
    pub fn resolve_query<'a>(&'a self, query: Option<&'a str>) -> &'a str {
        query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(self.default_query.as_str())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    model: Option<String>,
    default_query: Option<String>,
    sectors: Option<Vec<MarketSector>>,
    max_sources: Option<usize>,
    request_timeout: Option<Duration>,
    temperature: Option<f32>,
}

impl MarketConfigBuilder {
    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Load the model from `GEMINI_MODEL` if set
    pub fn from_env_model(mut self) -> Self {
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                self.model = Some(model);
            }
        }
        self
    }

    /// Set the default query
    pub fn default_query(mut self, query: impl Into<String>) -> Self {
        self.default_query = Some(query.into());
        self
    }

    /// Set the covered sectors
    pub fn sectors(mut self, sectors: Vec<MarketSector>) -> Self {
        self.sectors = Some(sectors);
        self
    }

    /// Set the maximum number of displayed sources
    pub fn max_sources(mut self, max: usize) -> Self {
        self.max_sources = Some(max);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            model: self.model.unwrap_or(defaults.model),
            default_query: self.default_query.unwrap_or(defaults.default_query),
            sectors: self.sectors.unwrap_or(defaults.sectors),
            max_sources: self.max_sources.unwrap_or(defaults.max_sources),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            temperature: self.temperature.or(defaults.temperature),
        };

        config.validate()?;
        Ok(config)
    }
}
