//! Analysis request client
//!
//! Turns an optional free-text query into one schema-constrained, search
//! grounded generation and parses the answer into an [`AnalysisResult`].

use crate::config::MarketConfig;
use crate::error::{AnalysisError, Result};
use crate::model::{AnalysisResult, GroundingSource, RawSentiment, SentimentEntry, SentimentPayload};
use crate::prompts::{sentiment_prompt, sentiment_schema};
use async_trait::async_trait;
use chrono::Utc;
use pulse_llm::{GenerateRequest, GenerativeProvider, GroundingMetadata, Tool};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Anything that can produce a market analysis for a query
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze `query`, or the default market-wide query when `None`
    async fn analyze(&self, query: Option<String>) -> Result<AnalysisResult>;
}

/// Client for the sentiment analysis round trip
pub struct AnalysisClient {
    provider: Arc<dyn GenerativeProvider>,
    config: Arc<MarketConfig>,
}

impl AnalysisClient {
    pub fn new(provider: Arc<dyn GenerativeProvider>, config: Arc<MarketConfig>) -> Self {
        Self { provider, config }
    }

    /// Build the generation request for `query`
    pub fn build_request(&self, query: Option<&str>) -> Result<GenerateRequest> {
        let target = self.config.resolve_query(query);
        let prompt = sentiment_prompt(target, &self.config.sectors)?;

        let mut builder = GenerateRequest::builder(&self.config.model)
            .prompt(prompt)
            .json_schema(sentiment_schema())
            .tool(Tool::WebSearch);

        if let Some(t) = self.config.temperature {
            builder = builder.temperature(t);
        }

        Ok(builder.build())
    }

    /// Run one analysis round trip
    #[instrument(skip(self), fields(provider = self.provider.name(), model = %self.config.model))]
    pub async fn analyze_query(&self, query: Option<&str>) -> Result<AnalysisResult> {
        let request = self.build_request(query)?;

        let response = self.provider.generate(request).await.map_err(|e| {
            warn!("Generation failed: {e}");
            AnalysisError::from(e)
        })?;

        debug!(
            "Model answered with {} chars, {} tokens",
            response.text.len(),
            response.usage.total()
        );

        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        let result = assemble_result(&response.text, response.grounding.as_ref(), query)?;

        info!(
            "Analysis ready: {} sectors, {} sources",
            result.sentiments.len(),
            result.sources.len()
        );

        Ok(result)
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, query: Option<String>) -> Result<AnalysisResult> {
        self.analyze_query(query.as_deref()).await
    }
}

/// Merge the model text, grounding metadata and a fresh timestamp
pub fn assemble_result(
    text: &str,
    grounding: Option<&GroundingMetadata>,
    query: Option<String>,
) -> Result<AnalysisResult> {
    let payload = parse_payload(text)?;

    let sentiments = payload
        .sentiments
        .into_iter()
        .map(into_entry)
        .collect::<Result<Vec<_>>>()?;

    Ok(AnalysisResult {
        sentiments,
        global_outlook: payload.global_outlook,
        sources: grounding.map(extract_sources).unwrap_or_default(),
        timestamp: Utc::now(),
        query,
    })
}

/// One source per chunk that carries a web resource, in chunk order
pub fn extract_sources(metadata: &GroundingMetadata) -> Vec<GroundingSource> {
    metadata
        .web_resources()
        .filter_map(|web| {
            web.uri
                .as_deref()
                .map(|uri| GroundingSource::new(web.title.as_deref(), uri))
        })
        .collect()
}

fn parse_payload(text: &str) -> Result<SentimentPayload> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AnalysisError::Schema("empty response body".to_string()));
    }
    Ok(serde_json::from_str(body)?)
}

/// Remove a Markdown code fence wrapped around a JSON document
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    // Drop the info string ("json") ahead of the document
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.find(['{', '[']).map_or("", |start| &rest[start..]),
    };
    body.trim()
}

fn into_entry(raw: RawSentiment) -> Result<SentimentEntry> {
    let category = raw.category.trim().to_string();
    if category.is_empty() {
        return Err(AnalysisError::Range(
            "sentiment entry has an empty category".to_string(),
        ));
    }

    if !raw.score.is_finite() {
        return Err(AnalysisError::Range(format!(
            "score for {category} is not a number"
        )));
    }

    let score = clamp_score(raw.score);
    if is_adjusted(raw.score, score) {
        warn!("Score {} for {category} adjusted to {score}", raw.score);
    }

    Ok(SentimentEntry {
        category,
        score,
        summary: raw.summary,
        key_drivers: raw.key_drivers,
    })
}

/// Round to the nearest integer and clamp into 0..=100
pub fn clamp_score(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

fn is_adjusted(raw: f64, score: u8) -> bool {
    (raw - f64::from(score)).abs() > f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_llm::{FinishReason, GenerateResponse, GroundingChunk, LLMError, TokenUsage};
    use serde_json::json;
    use std::sync::Mutex;

    /// Provider returning a canned answer and recording requests
    struct FakeProvider {
        answer: Mutex<Option<pulse_llm::Result<GenerateResponse>>>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl FakeProvider {
        fn answering(result: pulse_llm::Result<GenerateResponse>) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(result)),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerativeProvider for FakeProvider {
        async fn generate(&self, request: GenerateRequest) -> pulse_llm::Result<GenerateResponse> {
            self.seen.lock().unwrap().push(request);
            self.answer
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(LLMError::RequestFailed("no answer queued".into())))
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn payload_json() -> String {
        json!({
            "sentiments": [
                { "category": "Stocks", "score": 72, "summary": "Earnings beat", "keyDrivers": ["AI capex", "Buybacks"] },
                { "category": "Crypto", "score": 35, "summary": "ETF outflows", "keyDrivers": ["Regulation"] },
                { "category": "Forex", "score": 50, "summary": "Range bound", "keyDrivers": [] },
                { "category": "Commodities", "score": 61, "summary": "Oil supply cut", "keyDrivers": ["OPEC+"] }
            ],
            "globalOutlook": "Risk-on tone with pockets of caution."
        })
        .to_string()
    }

    fn grounding() -> GroundingMetadata {
        GroundingMetadata {
            grounding_chunks: vec![
                GroundingChunk::web("https://www.reuters.com/markets/a", Some("Reuters: stocks rally")),
                GroundingChunk::default(),
                GroundingChunk::web("https://www.ft.com/content/b", None),
            ],
            web_search_queries: vec![],
        }
    }

    fn response(text: String, grounding: Option<GroundingMetadata>) -> GenerateResponse {
        GenerateResponse {
            text,
            grounding,
            finish_reason: FinishReason::Stop,
            usage: TokenUsage::default(),
        }
    }

    fn client(provider: Arc<FakeProvider>) -> AnalysisClient {
        AnalysisClient::new(provider, Arc::new(MarketConfig::default()))
    }

    #[tokio::test]
    async fn test_parses_sentiments_and_drops_chunks_without_web() {
        let provider = FakeProvider::answering(Ok(response(payload_json(), Some(grounding()))));
        let result = client(provider).analyze(None).await.unwrap();

        let categories: Vec<&str> = result.sentiments.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(categories, vec!["Stocks", "Crypto", "Forex", "Commodities"]);
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].title, "Reuters: stocks rally");
        assert_eq!(result.sources[1].title, "Market News Source");
        assert_eq!(result.sources[1].hostname(), "www.ft.com");
        assert!(result.query.is_none());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_payload_and_stamps_time() {
        let before = Utc::now();
        let provider = FakeProvider::answering(Ok(response(payload_json(), Some(grounding()))));
        let result = client(provider).analyze(Some("NVIDIA".into())).await.unwrap();

        let expected: serde_json::Value = serde_json::from_str(&payload_json()).unwrap();
        let actual = serde_json::to_value(&result).unwrap();
        assert_eq!(actual["sentiments"], expected["sentiments"]);
        assert_eq!(actual["globalOutlook"], expected["globalOutlook"]);
        assert!(result.timestamp >= before);
        assert!(result.timestamp <= Utc::now());
        assert_eq!(result.query.as_deref(), Some("NVIDIA"));
    }

    #[tokio::test]
    async fn test_request_carries_schema_search_and_query() {
        let provider = FakeProvider::answering(Ok(response(payload_json(), None)));
        let result = client(provider.clone()).analyze(Some("  gold  ".into())).await.unwrap();
        assert!(result.sources.is_empty());

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.model, crate::config::DEFAULT_MODEL);
        assert!(request.prompt.contains("market sentiment for gold."));
        assert_eq!(request.tools, vec![Tool::WebSearch]);
        assert_eq!(request.response_mime_type.as_deref(), Some("application/json"));
        assert!(request.response_schema.is_some());
    }

    #[tokio::test]
    async fn test_default_query_when_absent() {
        let provider = FakeProvider::answering(Ok(response(payload_json(), None)));
        client(provider.clone()).analyze(None).await.unwrap();
        let seen = provider.seen.lock().unwrap();
        assert!(seen[0].prompt.contains("major global markets"));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let provider = FakeProvider::answering(Err(LLMError::AuthenticationFailed));
        let err = client(provider).analyze(None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Transport(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_schema_failure() {
        let provider = FakeProvider::answering(Ok(response("Markets look fine".into(), None)));
        let err = client(provider).analyze(None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)));
    }

    #[test]
    fn test_missing_fields_is_schema_failure() {
        let err = assemble_result(r#"{"sentiments": []}"#, None, None).unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)));

        let err = assemble_result("", None, None).unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)));
    }

    #[test]
    fn test_empty_category_is_range_failure() {
        let text = r#"{"sentiments":[{"category":" ","score":50,"summary":"x","keyDrivers":[]}],"globalOutlook":"o"}"#;
        let err = assemble_result(text, None, None).unwrap_err();
        assert!(matches!(err, AnalysisError::Range(_)));
    }

    #[test]
    fn test_scores_are_rounded_and_clamped() {
        let text = r#"{"sentiments":[
            {"category":"Stocks","score":140,"summary":"x","keyDrivers":[]},
            {"category":"Crypto","score":-5,"summary":"x","keyDrivers":[]},
            {"category":"Forex","score":59.6,"summary":"x","keyDrivers":[]}
        ],"globalOutlook":"o"}"#;
        let result = assemble_result(text, None, None).unwrap();
        let scores: Vec<u8> = result.sentiments.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![100, 0, 60]);
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let fenced = format!("```json\n{}\n```", payload_json());
        let result = assemble_result(&fenced, None, None).unwrap();
        assert_eq!(result.sentiments.len(), 4);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("```"), "");
    }

    #[test]
    fn test_single_line_fence_keeps_document() {
        let text = r#"```json {"sentiments":[],"globalOutlook":"o"} ```"#;
        assert_eq!(
            strip_code_fence(text),
            r#"{"sentiments":[],"globalOutlook":"o"}"#
        );
        assert_eq!(strip_code_fence("```[1, 2]```"), "[1, 2]");

        let result = assemble_result(text, None, None).unwrap();
        assert!(result.sentiments.is_empty());
        assert_eq!(result.global_outlook, "o");
    }

    #[test]
    fn test_score_adjustment_detection() {
        assert!(!is_adjusted(72.0, 72));
        assert!(!is_adjusted(0.0, 0));
        assert!(!is_adjusted(100.0, 100));
        assert!(is_adjusted(59.6, 60));
        assert!(is_adjusted(140.0, 100));
        assert!(is_adjusted(-5.0, 0));
    }

    #[test]
    fn test_web_chunk_without_uri_is_skipped() {
        let metadata = GroundingMetadata {
            grounding_chunks: vec![GroundingChunk {
                web: Some(pulse_llm::WebResource {
                    uri: None,
                    title: Some("No link".into()),
                }),
            }],
            web_search_queries: vec![],
        };
        assert!(extract_sources(&metadata).is_empty());
    }
}
