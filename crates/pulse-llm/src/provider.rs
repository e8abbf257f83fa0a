//! Generative provider trait definition

use crate::{GenerateRequest, GenerateResponse, Result};
use async_trait::async_trait;

/// Trait for generative model providers
///
/// Implementations send one prompt (optionally constrained by a response
/// schema and augmented with tools) and return one complete answer.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Generate a single, complete response
    ///
    /// # Arguments
    ///
    /// * `request` - The prompt, schema, tools, and sampling parameters
    ///
    /// # Returns
    ///
    /// The response text plus any grounding metadata the provider attached
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;
}
