//! Generative model provider layer for market-pulse
//!
//! This crate provides provider-agnostic abstractions for asking a hosted
//! generative model for a schema-constrained answer. It includes:
//!
//! - Generation request/response types
//! - Response schema helpers
//! - Search grounding metadata types
//! - Provider trait for model implementations
//! - Concrete provider implementations (behind feature flags)

pub mod error;
pub mod generate;
pub mod grounding;
pub mod provider;
pub mod schema;

// Re-export main types
pub use error::{LLMError, Result};
pub use generate::{FinishReason, GenerateRequest, GenerateResponse, TokenUsage, Tool};
pub use grounding::{GroundingChunk, GroundingMetadata, WebResource};
pub use provider::GenerativeProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
