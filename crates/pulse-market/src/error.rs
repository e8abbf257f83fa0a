//! Error types for market analysis operations

use pulse_llm::LLMError;
use thiserror::Error;

/// Message shown to the user for any failed analysis
pub const USER_FACING_FAILURE: &str = "Failed to fetch market analysis. Please try again later.";

/// Market analysis specific errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network failure or non-success status from the model endpoint
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body is not valid JSON or misses required fields
    #[error("Schema error: {0}")]
    Schema(String),

    /// A value is outside its allowed range
    #[error("Range error: {0}")]
    Range(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// The single message shown in the dashboard, whatever the cause
    pub fn user_message(&self) -> &'static str {
        USER_FACING_FAILURE
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Convert provider errors, keeping the transport/decoding split
impl From<LLMError> for AnalysisError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::ConfigurationError(msg) => AnalysisError::Config(msg),
            other if other.is_transport() => AnalysisError::Transport(other.to_string()),
            other => AnalysisError::Schema(other.to_string()),
        }
    }
}

/// Convert JSON parsing errors
impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Schema(err.to_string())
    }
}
