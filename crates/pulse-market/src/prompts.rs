//! Prompt template and response schema for sentiment analysis

use crate::error::{AnalysisError, Result};
use crate::model::MarketSector;
use minijinja::{Environment, context};
use pulse_llm::schema;
use serde_json::{Value, json};

const SENTIMENT_TEMPLATE_NAME: &str = "market.sentiment";

const SENTIMENT_TEMPLATE: &str = "\
Analyze current market sentiment for {{ query }}. Focus on: {{ sectors | join(\", \") }}.
Provide a detailed sentiment analysis. Use Google Search so the findings reflect today's news.
Return the data strictly in the following JSON structure:
{
  \"sentiments\": [
    { \"category\": \"{{ sectors | first }}\", \"score\": 75, \"summary\": \"...\", \"keyDrivers\": [\"...\", \"...\"] },
    ...
  ],
  \"globalOutlook\": \"Brief overview of the day\"
}
Include exactly one entry per sector listed above.
The score should be 0 (extremely bearish) to 100 (extremely bullish).";

/// Render the sentiment prompt for `query` over `sectors`
pub fn sentiment_prompt(query: &str, sectors: &[MarketSector]) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(SENTIMENT_TEMPLATE_NAME, SENTIMENT_TEMPLATE)
        .map_err(|e| AnalysisError::Config(format!("invalid prompt template: {e}")))?;

    let sectors: Vec<&str> = sectors.iter().map(MarketSector::as_str).collect();

    env.get_template(SENTIMENT_TEMPLATE_NAME)
        .and_then(|t| t.render(context! { query => query, sectors => sectors }))
        .map_err(|e| AnalysisError::Config(format!("failed to render prompt: {e}")))
}

/// Schema the model's JSON answer must follow
pub fn sentiment_schema() -> Value {
    let entry = schema::object(
        json!({
            "category": schema::string(),
            "score": schema::describe(schema::number(), "0 (extremely bearish) to 100 (extremely bullish)"),
            "summary": schema::string(),
            "keyDrivers": schema::array(schema::string()),
        }),
        &["category", "score", "summary", "keyDrivers"],
    );

    schema::object(
        json!({
            "sentiments": schema::array(entry),
            "globalOutlook": schema::string(),
        }),
        &["sentiments", "globalOutlook"],
    )
}
