//! Core abstractions for the Integration SDK
//!
//! The gateway depends on these traits only, never on a concrete client:
//!
//! - `TextGenerator`: chat-style text generation
//! - `Reranker`: relevance ranking of candidate documents against a query
//! - `PdfRenderer`: HTML-to-PDF conversion into a caller-owned file
//! - `MailTransport`: outbound email delivery

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => f.write_str("system"),
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// A single message in a generation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Generates text from a list of chat messages
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the text of the first content block of the model's reply
    async fn generate(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;
}

/// A rerank call: score `documents` against `query` and keep the best `top_n`
#[derive(Debug, Clone, PartialEq)]
pub struct RerankRequest {
    pub model: String,
    pub query: String,
    pub documents: Vec<String>,
    pub top_n: usize,
}

/// One ranked candidate. `index` points into the request's `documents`.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankResult {
    pub index: usize,
    pub relevance_score: f64,
    /// Echo of the ranked document's text, when the service returns it
    pub document: Option<String>,
}

/// Ranks candidate documents, best first
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(&self, request: &RerankRequest) -> Result<Vec<RerankResult>>;
}

/// Converts an HTML document into a PDF written to `output`
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_to_file(&self, html: &str, output: &Path) -> Result<()>;
}

/// A file attached to an outgoing email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A plain-text email with optional attachments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<EmailAttachment>,
}

/// Delivers outgoing email
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}
