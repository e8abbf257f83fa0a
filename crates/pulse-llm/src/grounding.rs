//! Search grounding metadata
//!
//! When a search tool is enabled, the model attaches the web resources it
//! consulted as a list of chunks. Every field is optional on the wire.

use serde::{Deserialize, Serialize};

/// Citation metadata attached to a grounded answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Retrieved resources, in the order the provider reports them
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,

    /// Search queries the model issued
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_search_queries: Vec<String>,
}

/// One retrieved resource; only web resources are understood
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebResource>,
}

/// A web page cited by the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroundingChunk {
    /// Chunk backed by a web page
    pub fn web(uri: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            web: Some(WebResource {
                uri: Some(uri.into()),
                title: title.map(str::to_string),
            }),
        }
    }
}

impl GroundingMetadata {
    /// Web resources that carry a URI, in chunk order
    pub fn web_resources(&self) -> impl Iterator<Item = &WebResource> {
        self.grounding_chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .filter(|web| web.uri.is_some())
    }
}
