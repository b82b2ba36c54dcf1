//! Server-rendered pages.

use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use serde_json::Value;
use shared_types::{FailureChain, LogEntry, LogStatus};

use crate::error::PipelineError;

const INDEX_TEMPLATE: &str = "index";
const CHAIN_DETAILS_TEMPLATE: &str = "chain_details";

pub const DEFAULT_ERROR_CODE: &str = "AD_RENDER_FAILURE";

handlebars_helper!(tojson: |value: Json| serde_json::to_string(value).unwrap_or_default());

#[derive(Debug, Serialize)]
pub struct IndexPage<'a> {
    pub publisher_name: &'a str,
    pub publisher_id: &'a str,
    pub failure_chains: &'a [FailureChain],
}

/// A log entry plus its display-only fields
#[derive(Debug, Serialize)]
pub struct LogCard<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub status: LogStatus,
    pub failed: bool,
    pub timestamp: &'a str,
    pub display_timestamp: String,
    pub data: &'a Value,
    pub summary: &'a str,
}

impl<'a> From<&'a LogEntry> for LogCard<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        Self {
            id: &entry.id,
            title: &entry.title,
            status: entry.status,
            failed: entry.is_failure(),
            timestamp: &entry.timestamp,
            display_timestamp: entry.display_timestamp(),
            data: &entry.data,
            summary: &entry.summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChainDetailsPage<'a> {
    pub chain_id: &'a str,
    pub publisher_name: &'a str,
    pub publisher_id: &'a str,
    pub ad_unit: &'a str,
    pub page_url: &'a str,
    pub revenue_impact: &'a str,
    pub error_code: String,
    pub error_type: &'a str,
    pub page_load_time: String,
    pub logs: Vec<LogCard<'a>>,
}

impl<'a> ChainDetailsPage<'a> {
    /// Derive the display fields for a chain from its logs
    pub fn new(
        chain: &'a FailureChain,
        logs: &'a [LogEntry],
        publisher_name: &'a str,
        publisher_id: &'a str,
    ) -> Self {
        let error_code = logs
            .iter()
            .filter(|entry| entry.is_failure())
            .find_map(|entry| entry.data_field(&["adRenderMetrics", "errorCode"]))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ERROR_CODE)
            .to_string();

        let page_load_time = logs
            .iter()
            .find_map(|entry| entry.data_field(&["performanceMetrics", "pageLoadTime"]))
            .map(|ms| match ms {
                Value::String(text) => text.clone(),
                other => format!("{}ms", other),
            })
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            chain_id: &chain.id,
            publisher_name,
            publisher_id,
            ad_unit: &chain.ad_unit,
            page_url: &chain.page_url,
            revenue_impact: &chain.revenue_impact,
            error_code,
            error_type: &chain.failure_type,
            page_load_time,
            logs: logs.iter().map(LogCard::from).collect(),
        }
    }
}

/// Compiled page templates
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, PipelineError> {
        let mut registry = Handlebars::new();
        registry.register_helper("tojson", Box::new(tojson));
        registry.register_template_string(INDEX_TEMPLATE, include_str!("../templates/index.hbs"))?;
        registry.register_template_string(
            CHAIN_DETAILS_TEMPLATE,
            include_str!("../templates/chain_details.hbs"),
        )?;

        Ok(Self { registry })
    }

    pub fn index(&self, page: &IndexPage<'_>) -> Result<String, PipelineError> {
        Ok(self.registry.render(INDEX_TEMPLATE, page)?)
    }

    pub fn chain_details(&self, page: &ChainDetailsPage<'_>) -> Result<String, PipelineError> {
        Ok(self.registry.render(CHAIN_DETAILS_TEMPLATE, page)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{FailureLogStore, FixtureLogStore};

    #[tokio::test]
    async fn test_chain_details_derived_fields() {
        let store = FixtureLogStore::new();
        let chain = store.find_chain("FC-2342-123").await.unwrap().unwrap();
        let logs = store.chain_logs(&chain.id).await.unwrap();

        let page = ChainDetailsPage::new(&chain, &logs, "TechNews Daily", "pub-789");
        assert_eq!(page.error_code, "AD_RENDER_FAILURE");
        assert_eq!(page.error_type, "Render Failure");
        assert_eq!(page.page_load_time, "3500ms");
        assert_eq!(page.logs.len(), 5);
    }

    #[test]
    fn test_defaults_without_metrics() {
        let chain = FailureChain {
            id: "FC-1".to_string(),
            timestamp: "2024-12-06T14:23:15.233Z".to_string(),
            failure_type: "Bid Timeout".to_string(),
            ad_unit: "Header-728x90".to_string(),
            page_url: "/a".to_string(),
            revenue_impact: "$1.00".to_string(),
        };

        let page = ChainDetailsPage::new(&chain, &[], "p", "id");
        assert_eq!(page.error_code, DEFAULT_ERROR_CODE);
        assert_eq!(page.page_load_time, "unknown");
    }

    #[tokio::test]
    async fn test_log_cards_carry_json_data() {
        let store = FixtureLogStore::new();
        let chain = store.find_chain("FC-2342-123").await.unwrap().unwrap();
        let logs = store.chain_logs(&chain.id).await.unwrap();

        let html = Views::new()
            .unwrap()
            .chain_details(&ChainDetailsPage::new(&chain, &logs, "TechNews Daily", "pub-789"))
            .unwrap();

        assert!(html.contains("data-log-id=\"LOG-98765a\""));
        assert!(html.contains("&quot;sessionId&quot;"));
        assert!(html.contains("Sidebar-300x250"));
    }
}
