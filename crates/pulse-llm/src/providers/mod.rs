//! Concrete generative provider implementations
//!
//! This module contains implementations of the GenerativeProvider trait for
//! hosted model services.

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};
