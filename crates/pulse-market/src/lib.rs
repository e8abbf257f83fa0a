//! Market sentiment analysis
//!
//! This crate asks a hosted generative model, with web search grounding, for
//! the current sentiment of several market sectors and turns the answer into
//! a terminal dashboard. It includes:
//!
//! - The sentiment data model and its error taxonomy
//! - The analysis request client (prompt, response schema, parsing, citations)
//! - Sentiment gauges (score bands, labels, meters)
//! - View state with a pure reducer and request supersession
//! - Text rendering of the dashboard
//!
//! # Example
//!
//! ```rust,ignore
//! use pulse_llm::providers::GeminiProvider;
//! use pulse_market::{AnalysisClient, Dashboard, DashboardRenderer, MarketConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(GeminiProvider::from_env()?);
//!     let client = AnalysisClient::new(provider, Arc::new(MarketConfig::default()));
//!
//!     let mut dashboard = Dashboard::new(Arc::new(client));
//!     let pending = dashboard.start_initial();
//!     dashboard.run(pending).await;
//!
//!     println!("{}", DashboardRenderer::default().render("MarketPulse AI", dashboard.state()));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gauge;
pub mod model;
pub mod prompts;
pub mod render;
pub mod view;

// Re-export main types for convenience
pub use client::{AnalysisClient, Analyzer};
pub use config::MarketConfig;
pub use error::{AnalysisError, Result};
pub use gauge::{Band, Gauge};
pub use model::{AnalysisResult, GroundingSource, MarketSector, SentimentEntry};
pub use render::{DashboardRenderer, RenderOptions};
pub use view::{Dashboard, ViewEvent, ViewState, reduce};
