//! MarketPulse terminal dashboard
//!
//! Real-time market sentiment for stocks, crypto, forex and commodities,
//! grounded in live web search results.
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="..."
//!
//! # Interactive dashboard
//! cargo run --bin market-pulse
//!
//! # One analysis, printed as JSON
//! cargo run --bin market-pulse -- --once --json --query "NVIDIA earnings"
//! ```

mod commands;
mod shell;

use clap::Parser;
use pulse_llm::providers::{GeminiConfig, GeminiProvider};
use pulse_market::{AnalysisClient, Dashboard, DashboardRenderer, MarketConfig, RenderOptions};
use pulse_utils::Config;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "market-pulse")]
#[command(about = "Real-time market sentiment dashboard", long_about = None)]
struct Args {
    /// Analyze this query instead of the default market-wide view
    #[arg(short, long)]
    query: Option<String>,

    /// Run one analysis, print it and exit
    #[arg(long)]
    once: bool,

    /// Print the analysis as JSON instead of the dashboard
    #[arg(long, requires = "once")]
    json: bool,

    /// Model identifier
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// API base URL
    #[arg(long, env = "GEMINI_API_BASE")]
    api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Disable colours
    #[arg(long)]
    plain: bool,
}

/// Provider settings driven by the market config and CLI overrides
fn provider_config(
    base: GeminiConfig,
    config: &MarketConfig,
    api_base: Option<&str>,
) -> GeminiConfig {
    let gemini = base.with_timeout(config.request_timeout.as_secs());
    match api_base {
        Some(api_base) => gemini.with_api_base(api_base),
        None => gemini,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = Config::from_env();
    pulse_utils::init_tracing_with_default(&app.log_filter);

    let args = Args::parse();

    let mut builder = MarketConfig::builder()
        .from_env_model()
        .request_timeout(Duration::from_secs(args.timeout));
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }
    let config = Arc::new(builder.build()?);

    let gemini = provider_config(GeminiConfig::from_env(), &config, args.api_base.as_deref());
    let provider = Arc::new(GeminiProvider::with_config(gemini)?);

    info!(
        model = %config.model,
        api_base = %provider.config().api_base,
        environment = %app.environment,
        "Starting market-pulse"
    );

    let renderer = DashboardRenderer::new(RenderOptions {
        styled: !args.plain,
        max_sources: config.max_sources,
        ..RenderOptions::default()
    });
    let client = Arc::new(AnalysisClient::new(provider, Arc::clone(&config)));

    if args.once {
        if args.json {
            let result = client.analyze_query(args.query.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        let mut dashboard = Dashboard::new(client);
        let pending = match args.query.as_deref().and_then(|q| dashboard.submit_search(q)) {
            Some(pending) => pending,
            None => dashboard.start_initial(),
        };
        dashboard.run(pending).await;
        println!("{}", renderer.render(&app.app_name, dashboard.state()));

        if let Some(error) = &dashboard.state().error {
            anyhow::bail!("{error}");
        }
        return Ok(());
    }

    shell::run(Dashboard::new(client), renderer, app.app_name, args.query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_uses_configured_timeout() {
        let config = MarketConfig::builder()
            .request_timeout(Duration::from_secs(45))
            .build()
            .unwrap();

        let gemini = provider_config(GeminiConfig::new("key"), &config, None);
        assert_eq!(gemini.timeout_secs, 45);
        assert_eq!(gemini.api_key, "key");
        assert_eq!(gemini.api_base, GeminiConfig::default().api_base);
    }

    #[test]
    fn test_provider_api_base_override() {
        let config = MarketConfig::default();
        let gemini = provider_config(
            GeminiConfig::new("key"),
            &config,
            Some("http://localhost:8080/v1beta"),
        );
        assert_eq!(gemini.api_base, "http://localhost:8080/v1beta");
        assert_eq!(gemini.timeout_secs, 120);
    }
}
