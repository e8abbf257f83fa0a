//! Shared utilities for market-pulse
//!
//! This crate provides common functionality used across the market-pulse workspace,
//! including logging setup, configuration management, and environment helpers.

pub mod config;
pub mod logging;

pub use config::{Config, first_env};
pub use logging::init_tracing_with_default;
