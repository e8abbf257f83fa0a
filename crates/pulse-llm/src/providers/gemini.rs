//! Google Gemini provider implementation
//!
//! This module implements the GenerativeProvider trait for the Gemini
//! `generateContent` endpoint, including structured JSON output and the
//! Google Search grounding tool.
//! See: https://ai.google.dev/api/generate-content
//!
//! # Examples
//!
//! ```no_run
//! use pulse_llm::{GenerateRequest, GenerativeProvider, Tool};
//! use pulse_llm::providers::GeminiProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create provider from GEMINI_API_KEY environment variable
//!     let provider = GeminiProvider::from_env()?;
//!
//!     let request = GenerateRequest::builder("gemini-3-flash-preview")
//!         .prompt("Summarise today's bond market in one sentence.")
//!         .tool(Tool::WebSearch)
//!         .build();
//!
//!     let response = provider.generate(request).await?;
//!     println!("{}", response.text);
//!
//!     Ok(())
//! }
//! ```

use crate::{
    FinishReason, GenerateRequest, GenerateResponse, GenerativeProvider, GroundingMetadata,
    LLMError, Result, TokenUsage, Tool,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variables consulted for the API key, in order
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Configuration for Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    /// A missing key is not rejected here: the endpoint reports it as an
    /// authentication failure. Optionally reads `GEMINI_API_BASE`.
    pub fn from_env() -> Self {
        let api_key = pulse_utils::first_env(API_KEY_VARS).unwrap_or_else(|| {
            warn!("No Gemini API key found in {API_KEY_VARS:?}");
            String::new()
        });

        let api_base = pulse_utils::first_env(&["GEMINI_API_BASE"])
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());

        Self {
            api_key,
            api_base,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.api_base.trim_end_matches('/')
        )
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.timeout_secs == 0 {
            return Err(LLMError::ConfigurationError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new Gemini provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env())
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        debug!("Sending request to Gemini API at {}", self.config.api_base);

        let model = request.model.clone();
        let body = GeminiRequest::from(request);

        let response = self
            .client
            .post(self.config.endpoint(&model))
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(map_status(status, error_text, &model));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        gemini_response.into_generate_response()
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ============================================================================
// Gemini-specific request types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Default, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Error for a non-success HTTP status
fn map_status(status: StatusCode, body: String, model: &str) -> LLMError {
    match status.as_u16() {
        401 | 403 => LLMError::AuthenticationFailed,
        429 => LLMError::RateLimitExceeded(body),
        400 => LLMError::InvalidRequest(body),
        404 => LLMError::ModelNotFound(model.to_string()),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

impl GeminiContent {
    fn user(text: String) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![GeminiPart { text: Some(text) }],
        }
    }
}

impl From<GenerateRequest> for GeminiRequest {
    fn from(request: GenerateRequest) -> Self {
        let tools = request
            .tools
            .iter()
            .map(|tool| match tool {
                Tool::WebSearch => GeminiTool {
                    google_search: GoogleSearch::default(),
                },
            })
            .collect();

        Self {
            contents: vec![GeminiContent::user(request.prompt)],
            tools,
            generation_config: GenerationConfig {
                response_mime_type: request.response_mime_type,
                response_schema: request.response_schema,
                temperature: request.temperature,
            },
        }
    }
}

// ============================================================================
// Gemini-specific response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiResponse {
    fn into_generate_response(self) -> Result<GenerateResponse> {
        let usage = self.usage_metadata.unwrap_or_default();

        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map_or_else(|| "No candidates in response".to_string(), |r| {
                    format!("Prompt blocked: {r}")
                });
            return Err(LLMError::UnexpectedResponse(reason));
        };

        // Parts are concatenated in order, like the SDK's `text` accessor
        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .map_or(FinishReason::Stop, FinishReason::from_provider);

        debug!(
            "Received response - finish_reason: {:?}, tokens: {}/{}, grounded: {}",
            finish_reason,
            usage.prompt_token_count,
            usage.candidates_token_count,
            candidate.grounding_metadata.is_some()
        );

        Ok(GenerateResponse {
            text,
            grounding: candidate.grounding_metadata,
            finish_reason,
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        let map = |code: u16| {
            map_status(
                StatusCode::from_u16(code).unwrap(),
                "detail".to_string(),
                "gemini-3-flash-preview",
            )
        };

        assert!(matches!(map(401), LLMError::AuthenticationFailed));
        assert!(matches!(map(403), LLMError::AuthenticationFailed));
        assert!(matches!(map(429), LLMError::RateLimitExceeded(body) if body == "detail"));
        assert!(matches!(map(400), LLMError::InvalidRequest(body) if body == "detail"));
        assert!(
            matches!(map(404), LLMError::ModelNotFound(model) if model == "gemini-3-flash-preview")
        );

        let LLMError::RequestFailed(message) = map(503) else {
            panic!("503 should be a request failure");
        };
        assert!(message.contains("503"));
        assert!(message.contains("detail"));

        for code in [400, 401, 403, 404, 429, 500, 503] {
            assert!(map(code).is_transport(), "HTTP {code} should be a transport error");
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key");
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().name(), "gemini");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = GeminiProvider::with_config(GeminiConfig::new("k").with_timeout(0));
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));
    }

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("k").with_api_base("http://localhost:9000/v1beta/");
        assert_eq!(
            config.endpoint("gemini-3-flash-preview"),
            "http://localhost:9000/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest::builder("gemini-3-flash-preview")
            .prompt("Analyze markets")
            .json_schema(json!({ "type": "OBJECT" }))
            .tool(Tool::WebSearch)
            .build();

        let body = serde_json::to_value(GeminiRequest::from(request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze markets");
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["tools"], json!([{ "googleSearch": {} }]));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "{\"a\":" }, { "text": "1}" }]
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://news.example/a", "title": "A" } }
                    ]
                }
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 30 }
        });

        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        let response = response.into_generate_response().unwrap();

        assert_eq!(response.text, "{\"a\":1}");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.total(), 42);
        let grounding = response.grounding.unwrap();
        assert_eq!(grounding.grounding_chunks.len(), 1);
    }

    #[test]
    fn test_blocked_prompt() {
        let raw = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        let err = response.into_generate_response().unwrap_err();
        assert!(err.to_string().contains("Prompt blocked: SAFETY"));
    }

    #[test]
    fn test_candidate_without_content() {
        let raw = json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] });
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        let response = response.into_generate_response().unwrap();
        assert!(response.text.is_empty());
        assert_eq!(response.finish_reason, FinishReason::MaxTokens);
        assert!(response.grounding.is_none());
    }
}
