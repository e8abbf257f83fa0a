//! Generation request and response types

use crate::GroundingMetadata;
use serde::{Deserialize, Serialize};

/// MIME type asking the provider for a JSON document
pub const JSON_MIME_TYPE: &str = "application/json";

/// Tools the model may use while answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Real-time web search; answers come back with grounding metadata
    WebSearch,
}

/// Request for a single generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// User prompt
    pub prompt: String,

    /// Schema the response must follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,

    /// MIME type of the response body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    /// Tools available to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    /// Sampling temperature (0.0-2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response from a generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Concatenated text of the first candidate
    pub text: String,

    /// Citation metadata, when a search tool was used
    pub grounding: Option<GroundingMetadata>,

    /// Why the model stopped
    pub finish_reason: FinishReason,

    /// Token usage statistics
    pub usage: TokenUsage,
}

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural completion
    Stop,

    /// Hit max tokens limit
    MaxTokens,

    /// Blocked by safety filters
    Safety,

    /// Anything else the provider reports
    Other,
}

impl FinishReason {
    /// Map a provider's upper-case finish reason
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "STOP" => Self::Stop,
            "MAX_TOKENS" => Self::MaxTokens,
            "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" => Self::Safety,
            _ => Self::Other,
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    pub input_tokens: usize,

    /// Number of output tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

impl GenerateRequest {
    /// Create a builder for generation requests
    pub fn builder(model: impl Into<String>) -> GenerateRequestBuilder {
        GenerateRequestBuilder::new(model)
    }
}

/// Builder for GenerateRequest
pub struct GenerateRequestBuilder {
    model: String,
    prompt: String,
    response_schema: Option<serde_json::Value>,
    response_mime_type: Option<String>,
    tools: Vec<Tool>,
    temperature: Option<f32>,
}

impl GenerateRequestBuilder {
    /// Create a new builder
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: String::new(),
            response_schema: None,
            response_mime_type: None,
            tools: Vec::new(),
            temperature: None,
        }
    }

    /// Set the user prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Require a JSON response following `schema`
    pub fn json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self.response_mime_type = Some(JSON_MIME_TYPE.to_string());
        self
    }

    /// Enable a tool
    pub fn tool(mut self, tool: Tool) -> Self {
        if !self.tools.contains(&tool) {
            self.tools.push(tool);
        }
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the generation request
    pub fn build(self) -> GenerateRequest {
        GenerateRequest {
            model: self.model,
            prompt: self.prompt,
            response_schema: self.response_schema,
            response_mime_type: self.response_mime_type,
            tools: self.tools,
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let request = GenerateRequest::builder("gemini-3-flash-preview")
            .prompt("How are markets?")
            .json_schema(json!({ "type": "OBJECT" }))
            .tool(Tool::WebSearch)
            .tool(Tool::WebSearch)
            .temperature(0.2)
            .build();

        assert_eq!(request.model, "gemini-3-flash-preview");
        assert_eq!(request.prompt, "How are markets?");
        assert_eq!(request.response_mime_type.as_deref(), Some(JSON_MIME_TYPE));
        assert_eq!(request.tools, vec![Tool::WebSearch]);
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(FinishReason::from_provider("STOP"), FinishReason::Stop);
        assert_eq!(FinishReason::from_provider("MAX_TOKENS"), FinishReason::MaxTokens);
        assert_eq!(FinishReason::from_provider("SAFETY"), FinishReason::Safety);
        assert_eq!(FinishReason::from_provider("RECITATION"), FinishReason::Other);
    }

    #[test]
    fn test_token_usage() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
