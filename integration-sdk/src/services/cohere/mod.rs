//! Cohere API client implementation
//!
//! Implements [`TextGenerator`] over `/v2/chat` and [`Reranker`] over
//! `/v2/rerank`. Requests are sent once; failures are mapped to
//! [`ServiceError`] and returned.

mod models;
pub use models::*;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{CohereConfig, ConfigProvider, DEFAULT_PROVIDER};
use crate::core::{ChatMessage, RerankRequest, RerankResult, Reranker, TextGenerator};
use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, log_request, parse_error_response, UserAgent};

const SERVICE_NAME: &str = "cohere";

/// Cohere API client
#[derive(Debug, Clone)]
pub struct CohereClient {
    http_client: Client,
    config: CohereConfig,
}

impl CohereClient {
    /// Create a client from the process environment (`COHERE_*` variables)
    pub fn from_env() -> Result<Self> {
        let config = CohereConfig::from_provider(&**DEFAULT_PROVIDER)?;
        Self::new_with_config(config)
    }

    /// Create a client from any configuration provider
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        Self::new_with_config(CohereConfig::from_provider(provider)?)
    }

    /// Create a client with explicit configuration
    pub fn new_with_config(config: CohereConfig) -> Result<Self> {
        let http_client = build_http_client(
            Some(UserAgent {
                extra: Some("cohere-client".to_string()),
                ..UserAgent::default()
            }),
            Some(Duration::from_secs(config.timeout_seconds)),
        )?;

        if config.api_key.is_none() {
            log::warn!("COHERE_API_KEY is not set; Cohere requests will fail");
        }

        Ok(Self { http_client, config })
    }

    pub fn builder() -> CohereClientBuilder {
        CohereClientBuilder::default()
    }

    pub fn config(&self) -> &CohereConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            ServiceError::authentication("No API key set for Cohere client")
                .with_context_value("endpoint", endpoint)
        })?;

        let url = format!("{}/{}", self.config.base_url, endpoint);
        debug!("Sending request to Cohere: POST {}", url);

        let start_time = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        log_request(SERVICE_NAME, endpoint, start_time, status.as_u16());

        if !status.is_success() {
            return Err(parse_error_response(SERVICE_NAME, endpoint, response).await);
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to parse Cohere response: {}", e)))
    }
}

#[async_trait]
impl TextGenerator for CohereClient {
    async fn generate(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        if messages.is_empty() {
            return Err(ServiceError::validation("At least one chat message is required"));
        }

        let response: ChatResponse = self.post("v2/chat", &ChatRequest { model, messages }).await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| ServiceError::parsing("Cohere chat response contained no text"))
    }
}

#[async_trait]
impl Reranker for CohereClient {
    async fn rerank(&self, request: &RerankRequest) -> Result<Vec<RerankResult>> {
        if request.documents.is_empty() {
            return Ok(Vec::new());
        }

        let body = RerankBody {
            model: &request.model,
            query: &request.query,
            documents: &request.documents,
            top_n: request.top_n,
        };
        let response: RerankResponse = self.post("v2/rerank", &body).await?;

        response
            .results
            .into_iter()
            .map(|hit| {
                if hit.index >= request.documents.len() {
                    return Err(ServiceError::parsing(format!(
                        "Rerank result index {} is outside the {} submitted documents",
                        hit.index,
                        request.documents.len()
                    )));
                }

                Ok(RerankResult {
                    index: hit.index,
                    relevance_score: hit.relevance_score,
                    document: hit.document.map(|d| d.text),
                })
            })
            .collect()
    }
}

/// Builder for the Cohere client
#[derive(Default)]
pub struct CohereClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl CohereClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Build the client; unset values fall back to the defaults
    pub fn build(self) -> Result<CohereClient> {
        let mut config = CohereConfig::default();

        if let Some(api_key) = self.api_key {
            config.api_key = Some(api_key);
        }

        if let Some(base_url) = self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }

        CohereClient::new_with_config(config)
    }
}
