use serde::{Deserialize, Serialize};

/// A grouped sequence of pipeline events for one ad render attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureChain {
    pub id: String,
    pub timestamp: String,
    pub failure_type: String,
    pub ad_unit: String,
    pub page_url: String,
    #[serde(rename = "revenue_impact")]
    pub revenue_impact: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let chain = FailureChain {
            id: "FC-1".to_string(),
            timestamp: "2024-12-06T14:23:15.233Z".to_string(),
            failure_type: "Render Failure".to_string(),
            ad_unit: "Sidebar-300x250".to_string(),
            page_url: "/article/123".to_string(),
            revenue_impact: "$2.45".to_string(),
        };

        let value = serde_json::to_value(&chain).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "FC-1",
                "timestamp": "2024-12-06T14:23:15.233Z",
                "failureType": "Render Failure",
                "adUnit": "Sidebar-300x250",
                "pageUrl": "/article/123",
                "revenue_impact": "$2.45"
            })
        );
    }
}
