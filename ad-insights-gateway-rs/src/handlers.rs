//! HTTP handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, PipelineError};
use crate::views::{ChainDetailsPage, IndexPage};
use crate::AppState;

pub const SUMMARY_FAILED: &str = "Failed to generate summary";
pub const RECOMMENDATIONS_FAILED: &str = "Failed to generate recommendations";
pub const SEND_ALERT_FAILED: &str = "Failed to send email";
pub const PAGE_FAILED: &str = "Failed to render page";
pub const CHAIN_NOT_FOUND: &str = "Chain not found";
pub const EMAIL_SENT: &str = "Email sent successfully";

#[derive(Debug, Deserialize)]
pub struct GenerateSummaryRequest {
    #[serde(rename = "logData", default)]
    pub log_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRecommendationsRequest {
    #[serde(default)]
    pub summaries: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub recommendations: String,
    pub links: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendAlertRequest {
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendAlertResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: u64,
    pub status: String,
    pub corpus_size: usize,
    pub timestamp: String,
}

/// POST /api/generate-summary
pub async fn generate_summary(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateSummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(request) = payload?;

    let summary = state
        .summaries
        .summarize(request.log_data.as_ref())
        .await
        .map_err(|err| ApiError::from_pipeline(err, SUMMARY_FAILED))?;

    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}

/// POST /api/generate-recommendations
pub async fn generate_recommendations(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRecommendationsRequest>, JsonRejection>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let Json(request) = payload?;

    let recommendation = state
        .recommendations
        .recommend(request.summaries.as_ref())
        .await
        .map_err(|err| ApiError::from_pipeline(err, RECOMMENDATIONS_FAILED))?;

    Ok(Json(RecommendationsResponse {
        success: true,
        recommendations: recommendation.text,
        links: recommendation.links,
    }))
}

/// POST /api/send-alert
pub async fn send_alert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendAlertRequest>, JsonRejection>,
) -> Result<Json<SendAlertResponse>, ApiError> {
    let Json(request) = payload?;

    state
        .alerts
        .send_alert(request.html.as_deref())
        .await
        .map_err(|err| ApiError::from_pipeline(err, SEND_ALERT_FAILED))?;

    Ok(Json(SendAlertResponse {
        success: true,
        message: EMAIL_SENT.to_string(),
    }))
}

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_index(&state)
        .await
        .map(Html)
        .map_err(|err| ApiError::from_pipeline(err, PAGE_FAILED))
}

async fn render_index(state: &AppState) -> Result<String, PipelineError> {
    let chains = state.store.failure_chains().await?;
    state.views.index(&IndexPage {
        publisher_name: &state.config.publisher_name,
        publisher_id: &state.config.publisher_id,
        failure_chains: &chains,
    })
}

/// GET /api/chain/:chain_id
pub async fn chain_details(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let chain = state
        .store
        .find_chain(&chain_id)
        .await
        .map_err(|err| ApiError::from_pipeline(err.into(), PAGE_FAILED))?
        .ok_or_else(|| ApiError::NotFound(CHAIN_NOT_FOUND.to_string()))?;

    let logs = state
        .store
        .chain_logs(&chain.id)
        .await
        .map_err(|err| ApiError::from_pipeline(err.into(), PAGE_FAILED))?;

    let page = ChainDetailsPage::new(
        &chain,
        &logs,
        &state.config.publisher_name,
        &state.config.publisher_id,
    );

    state
        .views
        .chain_details(&page)
        .map(Html)
        .map_err(|err| ApiError::from_pipeline(err, PAGE_FAILED))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        service_name: config_rs::get_formatted_service_name(crate::config::SERVICE_NAME),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        status: "SERVING".to_string(),
        corpus_size: state.corpus.len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
