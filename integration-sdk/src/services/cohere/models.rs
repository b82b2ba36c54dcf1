//! Cohere API data models
//!
//! Wire types for the v2 chat and rerank endpoints.

use serde::{Deserialize, Serialize};

use crate::core::ChatMessage;

/// Chat request (`POST /v2/chat`)
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
}

/// Chat response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub finish_reason: Option<String>,

    pub message: AssistantMessage,
}

impl ChatResponse {
    /// Text of the first text content block
    pub fn first_text(&self) -> Option<&str> {
        self.message
            .content
            .iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// One block of assistant output
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default = "text_kind")]
    pub kind: String,

    #[serde(default)]
    pub text: Option<String>,
}

fn text_kind() -> String {
    "text".to_string()
}

/// Rerank request (`POST /v2/rerank`)
#[derive(Debug, Clone, Serialize)]
pub struct RerankBody<'a> {
    pub model: &'a str,
    pub query: &'a str,
    pub documents: &'a [String],
    pub top_n: usize,
}

/// Rerank response
#[derive(Debug, Clone, Deserialize)]
pub struct RerankResponse {
    #[serde(default)]
    pub id: Option<String>,

    pub results: Vec<RerankHit>,
}

/// A single ranked candidate
#[derive(Debug, Clone, Deserialize)]
pub struct RerankHit {
    pub index: usize,
    pub relevance_score: f64,

    /// Echo of the ranked document, when the API includes it
    #[serde(default)]
    pub document: Option<RerankDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RerankDocument {
    pub text: String,
}
