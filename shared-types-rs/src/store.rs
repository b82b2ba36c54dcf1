//! Read access to failure chains and their pipeline logs.

use async_trait::async_trait;
use serde_json::json;

use crate::chains::FailureChain;
use crate::logs::{LogEntry, LogStatus};
use crate::Result;

/// Source of failure chains and the logs that make them up
#[async_trait]
pub trait FailureLogStore: Send + Sync {
    /// All known failure chains, most recent last
    async fn failure_chains(&self) -> Result<Vec<FailureChain>>;

    /// Exact-match lookup by chain id
    async fn find_chain(&self, chain_id: &str) -> Result<Option<FailureChain>> {
        Ok(self
            .failure_chains()
            .await?
            .into_iter()
            .find(|chain| chain.id == chain_id))
    }

    /// The ordered pipeline logs for a chain
    async fn chain_logs(&self, chain_id: &str) -> Result<Vec<LogEntry>>;
}

/// In-memory demo data set: three chains sharing one five-stage log sequence
#[derive(Debug, Clone)]
pub struct FixtureLogStore {
    chains: Vec<FailureChain>,
    logs: Vec<LogEntry>,
}

impl Default for FixtureLogStore {
    fn default() -> Self {
        Self {
            chains: fixture_chains(),
            logs: fixture_logs(),
        }
    }
}

impl FixtureLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FailureLogStore for FixtureLogStore {
    async fn failure_chains(&self) -> Result<Vec<FailureChain>> {
        Ok(self.chains.clone())
    }

    async fn chain_logs(&self, chain_id: &str) -> Result<Vec<LogEntry>> {
        tracing::debug!(%chain_id, "serving fixture log sequence");
        Ok(self.logs.clone())
    }
}

fn chain(
    id: &str,
    timestamp: &str,
    failure_type: &str,
    ad_unit: &str,
    page_url: &str,
    revenue_impact: &str,
) -> FailureChain {
    FailureChain {
        id: id.to_string(),
        timestamp: timestamp.to_string(),
        failure_type: failure_type.to_string(),
        ad_unit: ad_unit.to_string(),
        page_url: page_url.to_string(),
        revenue_impact: revenue_impact.to_string(),
    }
}

fn fixture_chains() -> Vec<FailureChain> {
    vec![
        chain(
            "FC-2342-123",
            "2024-12-06T14:23:15.233Z",
            "Render Failure",
            "Sidebar-300x250",
            "/article/123",
            "$2.45",
        ),
        chain(
            "FC-3542-323",
            "2024-12-06T15:45:22.156Z",
            "Bid Timeout",
            "Header-728x90",
            "/article/456",
            "$3.12",
        ),
        chain(
            "FC-4234-554",
            "2024-12-06T16:12:08.789Z",
            "Creative Load Error",
            "InContent-300x250",
            "/article/789",
            "$1.89",
        ),
    ]
}

fn fixture_logs() -> Vec<LogEntry> {
    vec![
        LogEntry {
            id: "LOG-98765a".to_string(),
            title: "Page Load".to_string(),
            status: LogStatus::Success,
            timestamp: "2024-12-06T14:23:15.233Z".to_string(),
            data: json!({
                "timestamp": "2024-12-06T14:23:15.233Z",
                "sessionId": "s123456789",
                "publisherId": "pub-789",
                "pageUrl": "https://example-publisher.com/article/123",
                "userContext": {
                    "deviceType": "desktop",
                    "browser": "chrome",
                    "browserVersion": "120.0.0",
                    "viewport": [1920, 1080],
                    "connection": "4g"
                }
            }),
            summary: "Initial page load detected on desktop Chrome browser with 4G connection"
                .to_string(),
        },
        LogEntry {
            id: "LOG-98765b".to_string(),
            title: "Bid Start".to_string(),
            status: LogStatus::Success,
            timestamp: "2024-12-06T14:23:15.250Z".to_string(),
            data: json!({
                "timestamp": "2024-12-06T14:23:15.250Z",
                "sessionId": "s123456789",
                "publisherId": "pub-789",
                "adUnitData": {
                    "adUnitId": "div-gpt-ad-1234567890",
                    "size": [300, 250],
                    "position": "sidebar"
                },
                "bidDetails": {
                    "indexExchangeBidId": "ix_bid_98765"
                }
            }),
            summary: "Bid request initiated for 300x250 sidebar ad placement".to_string(),
        },
        LogEntry {
            id: "LOG-98765c".to_string(),
            title: "Bid Complete".to_string(),
            status: LogStatus::Success,
            timestamp: "2024-12-06T14:23:15.383Z".to_string(),
            data: json!({
                "timestamp": "2024-12-06T14:23:15.383Z",
                "sessionId": "s123456789",
                "publisherId": "pub-789",
                "adUnitData": {
                    "adUnitId": "div-gpt-ad-1234567890",
                    "bidDetails": {
                        "indexExchangeBidId": "ix_bid_98765",
                        "bidPrice": 2.45,
                        "bidLatency": 150,
                        "bidStatus": "won",
                        "winningBidTime": "2024-12-06T14:23:15.383Z"
                    }
                }
            }),
            summary: "Successful bid won at $2.45 with 150ms latency".to_string(),
        },
        LogEntry {
            id: "LOG-98765d".to_string(),
            title: "Render Start".to_string(),
            status: LogStatus::Success,
            timestamp: "2024-12-06T14:23:15.400Z".to_string(),
            data: json!({
                "timestamp": "2024-12-06T14:23:15.400Z",
                "sessionId": "s123456789",
                "publisherId": "pub-789",
                "adUnitData": {
                    "adUnitId": "div-gpt-ad-1234567890",
                    "adCreativeId": "creative_456",
                    "renderStartTime": "2024-12-06T14:23:15.400Z"
                }
            }),
            summary: "Ad creative rendering process initiated".to_string(),
        },
        LogEntry {
            id: "LOG-98765e".to_string(),
            title: "Render Failure".to_string(),
            status: LogStatus::Failed,
            timestamp: "2024-12-06T14:23:15.583Z".to_string(),
            data: json!({
                "timestamp": "2024-12-06T14:23:15.583Z",
                "sessionId": "s123456789",
                "publisherId": "pub-789",
                "adUnitData": {
                    "adUnitId": "div-gpt-ad-1234567890",
                    "adCreativeId": "creative_456"
                },
                "adRenderMetrics": {
                    "timeToFirstByte": null,
                    "renderStartTime": "2024-12-06T14:23:15.400Z",
                    "renderCompleteTime": null,
                    "viewability": 0,
                    "errorCode": "AD_RENDER_FAILURE",
                    "errorMessage": "Failed to load ad creative",
                    "failureTimestamp": "2024-12-06T14:23:15.583Z"
                },
                "performanceMetrics": {
                    "pageLoadTime": 3500,
                    "domInteractive": 2800,
                    "adFrameLoadTime": null,
                    "networkErrors": {
                        "type": "REQUEST_FAILED",
                        "details": "Network request to ad creative failed with status 503"
                    }
                }
            }),
            summary: "Ad rendering failed due to network error (503) when attempting to load creative content"
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::LogStage;

    #[tokio::test]
    async fn test_fixture_chains() {
        let store = FixtureLogStore::new();
        let chains = store.failure_chains().await.unwrap();
        assert_eq!(chains.len(), 3);

        let chain = store.find_chain("FC-2342-123").await.unwrap().unwrap();
        assert_eq!(chain.ad_unit, "Sidebar-300x250");
        assert_eq!(chain.revenue_impact, "$2.45");

        assert!(store.find_chain("FC-0000-000").await.unwrap().is_none());
        assert!(store.find_chain("fc-2342-123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fixture_logs_cover_every_stage_in_order() {
        let store = FixtureLogStore::new();
        let logs = store.chain_logs("FC-3542-323").await.unwrap();

        let stages: Vec<_> = logs.iter().filter_map(LogEntry::stage).collect();
        assert_eq!(stages, LogStage::ALL.to_vec());

        let failures: Vec<_> = logs.iter().filter(|log| log.is_failure()).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].stage(), Some(LogStage::RenderFailure));
    }
}
