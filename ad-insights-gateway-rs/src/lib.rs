//! Ad pipeline failure insights gateway.
//!
//! Serves the dashboard and chain pages, and the JSON endpoints that
//! summarize logs, recommend remediations and email PDF alert reports.
//! All shared state lives in [`AppState`], built once at startup.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use integration_sdk::{MailTransport, PdfRenderer, Reranker, TextGenerator};
use shared_types::{FailureLogStore, RecommendationCorpus};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod alerts;
pub mod analysis;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod prompts;
pub mod views;

use alerts::AlertService;
use analysis::{RecommendationService, SummaryService};
use config::AppConfig;
use error::PipelineError;
use prompts::PromptRegistry;
use views::Views;

/// Maximum request body size
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// External collaborators and data sources the gateway is wired to
pub struct Collaborators {
    pub generator: Arc<dyn TextGenerator>,
    pub reranker: Arc<dyn Reranker>,
    pub renderer: Arc<dyn PdfRenderer>,
    pub mailer: Arc<dyn MailTransport>,
    pub store: Arc<dyn FailureLogStore>,
    pub corpus: Arc<RecommendationCorpus>,
    /// Sender address for alert emails
    pub mail_sender: Option<String>,
}

/// Shared, read-only application state
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn FailureLogStore>,
    pub corpus: Arc<RecommendationCorpus>,
    pub summaries: SummaryService,
    pub recommendations: RecommendationService,
    pub alerts: AlertService,
    pub views: Views,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, collaborators: Collaborators) -> Result<Self, PipelineError> {
        let prompts = Arc::new(PromptRegistry::new(&config.prompt_dir));

        let summaries = SummaryService::new(
            collaborators.generator.clone(),
            prompts.clone(),
            &config.generation_model,
        );
        let recommendations = RecommendationService::new(
            collaborators.generator,
            collaborators.reranker,
            collaborators.corpus.clone(),
            prompts,
            &config.generation_model,
            &config.rerank_model,
            config.rerank_top_n,
        );
        let alerts = AlertService::new(
            collaborators.renderer,
            collaborators.mailer,
            collaborators.mail_sender,
            config.alert_email.clone(),
        );

        Ok(Self {
            store: collaborators.store,
            corpus: collaborators.corpus,
            summaries,
            recommendations,
            alerts,
            views: Views::new()?,
            started_at: Instant::now(),
            config,
        })
    }
}

/// Build the router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/generate-summary", post(handlers::generate_summary))
        .route("/api/generate-recommendations", post(handlers::generate_recommendations))
        .route("/api/send-alert", post(handlers::send_alert))
        .route("/api/chain/:chain_id", get(handlers::chain_details))
        .nest_service("/static", static_files)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}
