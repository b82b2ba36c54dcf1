// ad-insights-gateway-rs/src/main.rs
// Ad pipeline failure insights: HTTP entry point (default port 5000)

use std::sync::Arc;

use ad_insights_gateway::config::AppConfig;
use ad_insights_gateway::logging::{init_logging, LoggingConfig};
use ad_insights_gateway::{create_router, AppState, Collaborators};
use integration_sdk::cohere::CohereClient;
use integration_sdk::config::DEFAULT_PROVIDER;
use integration_sdk::pdf::CommandPdfRenderer;
use integration_sdk::smtp::SmtpMailer;
use shared_types::{FixtureLogStore, RecommendationCorpus};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded_env = config_rs::load_dotenv();

    let provider = &**DEFAULT_PROVIDER;
    init_logging(LoggingConfig::from_provider(provider));
    if loaded_env {
        tracing::info!("Loaded configuration from .env");
    }

    let config = AppConfig::from_provider(provider);
    tracing::info!(
        generation_model = %config.generation_model,
        rerank_model = %config.rerank_model,
        top_n = config.rerank_top_n,
        prompt_dir = %config.prompt_dir.display(),
        "Using model configuration"
    );

    let corpus = Arc::new(RecommendationCorpus::load(&config.recommendation_log_path)?);
    let cohere = Arc::new(CohereClient::from_env()?);
    let mailer = SmtpMailer::from_env()?;
    let mail_sender = mailer.username().map(str::to_string);

    if config.alert_email.is_none() {
        tracing::warn!("ALERT_EMAIL is not set; alert delivery will fail");
    }

    let collaborators = Collaborators {
        generator: cohere.clone(),
        reranker: cohere,
        renderer: Arc::new(CommandPdfRenderer::from_env()?),
        mailer: Arc::new(mailer),
        store: Arc::new(FixtureLogStore::new()),
        corpus,
        mail_sender,
    };

    let addr = config.bind_address;
    let state = Arc::new(AppState::new(config, collaborators)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Ad insights gateway starting on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
