//! Gateway configuration, read once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use integration_sdk::{ConfigProvider, ConfigProviderExt};

pub const SERVICE_NAME: &str = "ad-insights";
pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_GENERATION_MODEL: &str = "command-r-plus-08-2024";
pub const DEFAULT_RERANK_MODEL: &str = "rerank-v3.5";
pub const DEFAULT_RERANK_TOP_N: usize = 3;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    pub generation_model: String,
    pub rerank_model: String,
    pub rerank_top_n: usize,
    pub prompt_dir: PathBuf,
    pub recommendation_log_path: PathBuf,
    pub static_dir: PathBuf,
    /// Alert recipient; sends fail when unset
    pub alert_email: Option<String>,
    pub publisher_name: String,
    pub publisher_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            rerank_top_n: DEFAULT_RERANK_TOP_N,
            prompt_dir: PathBuf::from("app/prompts"),
            recommendation_log_path: PathBuf::from("app/data/recommendation-log.json"),
            static_dir: PathBuf::from("static"),
            alert_email: None,
            publisher_name: "TechNews Daily".to_string(),
            publisher_id: "pub-789".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Self {
        let defaults = Self::default();
        let path_or = |key: &str, default: &PathBuf| {
            provider
                .get_optional(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| default.clone())
        };

        let rerank_top_n = match provider.get_int("rerank_top_n") {
            Ok(n) if n > 0 => n as usize,
            Ok(n) => {
                tracing::warn!(value = n, "RERANK_TOP_N must be positive, using default");
                DEFAULT_RERANK_TOP_N
            }
            Err(_) => DEFAULT_RERANK_TOP_N,
        };

        Self {
            bind_address: config_rs::get_bind_address(SERVICE_NAME, DEFAULT_PORT),
            generation_model: provider.get_string_or("generation_model", DEFAULT_GENERATION_MODEL),
            rerank_model: provider.get_string_or("rerank_model", DEFAULT_RERANK_MODEL),
            rerank_top_n,
            prompt_dir: path_or("prompt_dir", &defaults.prompt_dir),
            recommendation_log_path: path_or(
                "recommendation_log_path",
                &defaults.recommendation_log_path,
            ),
            static_dir: path_or("static_dir", &defaults.static_dir),
            alert_email: provider.get_optional("alert_email"),
            publisher_name: provider.get_string_or("publisher_name", &defaults.publisher_name),
            publisher_id: provider.get_string_or("publisher_id", &defaults.publisher_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integration_sdk::MemoryConfigProvider;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_provider(&MemoryConfigProvider::new());
        assert_eq!(config.generation_model, "command-r-plus-08-2024");
        assert_eq!(config.rerank_model, "rerank-v3.5");
        assert_eq!(config.rerank_top_n, 3);
        assert_eq!(config.prompt_dir, PathBuf::from("app/prompts"));
        assert!(config.alert_email.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("rerank_top_n", "5");
        provider.set("alert_email", "oncall@example.com");
        provider.set("publisher_id", "pub-42");
        provider.set("prompt_dir", "/srv/prompts");

        let config = AppConfig::from_provider(&provider);
        assert_eq!(config.rerank_top_n, 5);
        assert_eq!(config.alert_email.as_deref(), Some("oncall@example.com"));
        assert_eq!(config.publisher_id, "pub-42");
        assert_eq!(config.prompt_dir, PathBuf::from("/srv/prompts"));

        provider.set("rerank_top_n", "0");
        assert_eq!(AppConfig::from_provider(&provider).rerank_top_n, 3);
    }
}
