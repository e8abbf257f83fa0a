//! Sentiment data model

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when a cited source has none
pub const DEFAULT_SOURCE_TITLE: &str = "Market News Source";

/// Market sectors covered by every analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketSector {
    Stocks,
    Crypto,
    Forex,
    Commodities,
}

impl MarketSector {
    /// All sectors, in display order
    pub const ALL: [MarketSector; 4] = [
        MarketSector::Stocks,
        MarketSector::Crypto,
        MarketSector::Forex,
        MarketSector::Commodities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSector::Stocks => "Stocks",
            MarketSector::Crypto => "Crypto",
            MarketSector::Forex => "Forex",
            MarketSector::Commodities => "Commodities",
        }
    }
}

impl fmt::Display for MarketSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sector's assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentEntry {
    /// Sector name, e.g. "Stocks"
    pub category: String,
    /// 0 = maximally bearish, 100 = maximally bullish
    pub score: u8,
    /// Rationale
    pub summary: String,
    /// Short phrases, in model order
    pub key_drivers: Vec<String>,
}

/// A cited reference backing the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

impl GroundingSource {
    pub fn new(title: Option<&str>, uri: impl Into<String>) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SOURCE_TITLE);
        Self {
            title: title.to_string(),
            uri: uri.into(),
        }
    }

    /// Host part of the URI, or the raw URI when it has none
    pub fn hostname(&self) -> String {
        url::Url::parse(&self.uri)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.uri.clone())
    }
}

/// The aggregate returned per query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub sentiments: Vec<SentimentEntry>,
    pub global_outlook: String,
    pub sources: Vec<GroundingSource>,
    /// When the client received the result
    pub timestamp: DateTime<Utc>,
    /// The user query this answers; `None` for the default market-wide query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl AnalysisResult {
    /// Capture time rendered in local time, e.g. "14:03:27"
    pub fn time_label(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }

    /// At most `limit` sources, in original order
    pub fn display_sources(&self, limit: usize) -> &[GroundingSource] {
        &self.sources[..self.sources.len().min(limit)]
    }
}

/// Payload as the model returns it, before range checks
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SentimentPayload {
    pub sentiments: Vec<RawSentiment>,
    pub global_outlook: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSentiment {
    pub category: String,
    pub score: f64,
    pub summary: String,
    pub key_drivers: Vec<String>,
}
