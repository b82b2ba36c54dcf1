//! Configuration management for service clients
//!
//! This module provides utilities for loading and validating configuration
//! for the external collaborators, with support for environment variables.

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value.parse::<i64>().map_err(|e| {
            ServiceError::configuration(format!("Invalid integer for key {}: {}", key, e))
        })
    }

    /// Get a boolean configuration value
    fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key)?;
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(ServiceError::configuration(format!(
                "Invalid boolean value for key {}: {}",
                key, value
            ))),
        }
    }

    /// Get a non-empty string value, treating blank values as unset
    fn get_optional(&self, key: &str) -> Option<String> {
        self.get_string(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get an integer configuration value with a default
    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    /// Get a boolean configuration value with a default
    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
///
/// Keys map to upper-case variable names, with every non-alphanumeric
/// character replaced by `_` (`cohere_api_key` reads `COHERE_API_KEY`).
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider;

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self
    }

    /// Format a configuration key as an environment variable
    fn format_key(&self, key: &str) -> String {
        key.to_uppercase()
            .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                ServiceError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => ServiceError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| {
                ServiceError::configuration(format!("Configuration key not found: {}", key))
            })
    }
}

/// Global default configuration provider, reading unprefixed variables
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new()));

/// Trait for service-specific configuration
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

pub const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.com";
pub const DEFAULT_MAIL_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_MAIL_PORT: u16 = 587;
pub const DEFAULT_PDF_RENDERER_BIN: &str = "wkhtmltopdf";

/// Configuration for the Cohere chat and rerank API
///
/// A missing API key is not an error here; requests fail with an
/// authentication error when they are made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohereConfig {
    pub api_key: Option<String>,

    /// Base URL (can be changed for proxies and tests)
    pub base_url: String,

    pub timeout_seconds: u64,
}

impl Default for CohereConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_COHERE_BASE_URL.to_string(),
            timeout_seconds: 60,
        }
    }
}

impl CohereConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let config = Self {
            api_key: provider.get_optional("cohere_api_key"),
            base_url: provider
                .get_string_or("cohere_base_url", DEFAULT_COHERE_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            timeout_seconds: provider.get_int_or("cohere_timeout_seconds", 60).max(1) as u64,
        };

        config.validate()?;
        Ok(config)
    }
}

impl ServiceConfig for CohereConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ServiceError::configuration("Cohere base URL is required"));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "cohere"
    }
}

/// Configuration for the SMTP relay used to deliver alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_MAIL_SERVER.to_string(),
            port: DEFAULT_MAIL_PORT,
            username: None,
            password: None,
        }
    }
}

impl SmtpConfig {
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let port = provider.get_int_or("mail_port", DEFAULT_MAIL_PORT as i64);
        let port = u16::try_from(port)
            .map_err(|_| ServiceError::configuration(format!("Invalid mail port: {}", port)))?;

        let config = Self {
            server: provider.get_string_or("mail_server", DEFAULT_MAIL_SERVER),
            port,
            username: provider.get_optional("email_username"),
            password: provider.get_optional("email_password"),
        };

        config.validate()?;
        Ok(config)
    }
}

impl ServiceConfig for SmtpConfig {
    fn validate(&self) -> Result<()> {
        if self.server.is_empty() {
            return Err(ServiceError::configuration("Mail server is required"));
        }

        if self.port == 0 {
            return Err(ServiceError::configuration("Mail port must be non-zero"));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "smtp"
    }
}

/// Configuration for the command-line HTML-to-PDF renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfRendererConfig {
    /// Renderer executable
    pub program: String,

    /// Arguments; `{output}` is replaced with the target path and the HTML
    /// document is written to the process's stdin.
    pub args: Vec<String>,
}

impl Default for PdfRendererConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PDF_RENDERER_BIN.to_string(),
            args: vec!["--quiet".to_string(), "-".to_string(), "{output}".to_string()],
        }
    }
}

impl PdfRendererConfig {
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let config = Self {
            program: provider.get_string_or("pdf_renderer_bin", DEFAULT_PDF_RENDERER_BIN),
            ..Self::default()
        };

        config.validate()?;
        Ok(config)
    }
}

impl ServiceConfig for PdfRendererConfig {
    fn validate(&self) -> Result<()> {
        if self.program.is_empty() {
            return Err(ServiceError::configuration("PDF renderer program is required"));
        }

        if !self.args.iter().any(|a| a.contains("{output}")) {
            return Err(ServiceError::configuration(
                "PDF renderer arguments must contain an {output} placeholder",
            ));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_config_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("key1", "value1");
        provider.set("key2", "123");
        provider.set("blank", "   ");

        assert_eq!(provider.get_string("key1").unwrap(), "value1");
        assert_eq!(provider.get_int("key2").unwrap(), 123);
        assert!(provider.get_string("key3").is_err());
        assert_eq!(provider.get_optional("blank"), None);
    }

    #[test]
    fn test_env_config_provider_format_key() {
        let provider = EnvConfigProvider::new();

        assert_eq!(provider.format_key("cohere_api_key"), "COHERE_API_KEY");
        assert_eq!(provider.format_key("cohere.base-url"), "COHERE_BASE_URL");
    }

    #[test]
    fn test_cohere_config_defaults() {
        let config = CohereConfig::from_provider(&MemoryConfigProvider::new()).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_COHERE_BASE_URL);
        assert_eq!(config.timeout_seconds, 60);
    }
}
