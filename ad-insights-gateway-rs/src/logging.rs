//! Structured logging setup.

use std::sync::atomic::{AtomicBool, Ordering};

use integration_sdk::{ConfigProvider, ConfigProviderExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    pub service_name: String,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            service_name: config_rs::get_formatted_service_name(crate::config::SERVICE_NAME),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// `LOG_FORMAT=json` selects JSON output
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Self {
        let format = provider.get_string_or("log_format", "text");
        Self {
            json_format: format.eq_ignore_ascii_case("json"),
            ..Self::default()
        }
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = Registry::default().with(filter);

    let result = if config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if let Err(err) = result {
        eprintln!("failed to install tracing subscriber: {}", err);
        return;
    }

    tracing::info!(
        service = %config.service_name,
        json = config.json_format,
        "Structured logging initialized"
    );
}
