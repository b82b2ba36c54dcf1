//! Summary and recommendation generation.

use std::sync::Arc;

use integration_sdk::{ChatMessage, RerankRequest, Reranker, ServiceError, TextGenerator};
use serde_json::{Map, Value};
use shared_types::{LogStage, RecommendationCorpus};

use crate::error::PipelineError;
use crate::prompts::PromptRegistry;

pub const NO_LOG_DATA: &str = "No log data provided";
pub const NO_SUMMARIES: &str = "No summaries provided";
pub const NO_FAILURE_SUMMARY: &str = "No Render Failure summary provided";

/// Turns one pipeline log into a short natural-language summary
pub struct SummaryService {
    generator: Arc<dyn TextGenerator>,
    prompts: Arc<PromptRegistry>,
    model: String,
}

impl SummaryService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        prompts: Arc<PromptRegistry>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            prompts,
            model: model.into(),
        }
    }

    pub async fn summarize(&self, log_data: Option<&Value>) -> Result<String, PipelineError> {
        let log_data = log_data
            .filter(|value| !is_empty(value))
            .ok_or_else(|| PipelineError::invalid_input(NO_LOG_DATA))?;

        let title = log_data.get("title").and_then(Value::as_str);
        let prompt = self.prompts.summary_prompt(title).await?;
        tracing::debug!(title = ?title, prompt = %prompt.name, "generating summary");

        let payload = serde_json::to_string_pretty(log_data).map_err(ServiceError::from)?;
        let content = prompt.render(&[("log_data", &payload)])?;

        let summary = self
            .generator
            .generate(&self.model, &[ChatMessage::user(content)])
            .await?;
        Ok(summary)
    }
}

/// The generated remediation text plus the ids of the matched incidents
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub text: String,
    pub links: Vec<String>,
}

/// Matches a failure against past incidents and asks for a remediation
pub struct RecommendationService {
    generator: Arc<dyn TextGenerator>,
    reranker: Arc<dyn Reranker>,
    corpus: Arc<RecommendationCorpus>,
    prompts: Arc<PromptRegistry>,
    generation_model: String,
    rerank_model: String,
    top_n: usize,
}

impl RecommendationService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        reranker: Arc<dyn Reranker>,
        corpus: Arc<RecommendationCorpus>,
        prompts: Arc<PromptRegistry>,
        generation_model: impl Into<String>,
        rerank_model: impl Into<String>,
        top_n: usize,
    ) -> Self {
        Self {
            generator,
            reranker,
            corpus,
            prompts,
            generation_model: generation_model.into(),
            rerank_model: rerank_model.into(),
            top_n,
        }
    }

    /// `summaries` maps stage titles to their summary text, in request order
    pub async fn recommend(
        &self,
        summaries: Option<&Map<String, Value>>,
    ) -> Result<Recommendation, PipelineError> {
        let summaries = summaries
            .filter(|map| !map.is_empty())
            .ok_or_else(|| PipelineError::invalid_input(NO_SUMMARIES))?;

        let failure_summary = summaries
            .get(LogStage::RenderFailure.title())
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| PipelineError::invalid_input(NO_FAILURE_SUMMARY))?;

        let formatted_summaries = format_summaries(summaries);
        let (docs, links) = self.similar_incidents(failure_summary).await?;

        let prompt = self.prompts.recommendation_prompt().await?;
        let content = prompt.render(&[
            ("docs", &docs),
            ("formatted_summaries", &formatted_summaries),
        ])?;

        let text = self
            .generator
            .generate(&self.generation_model, &[ChatMessage::user(content)])
            .await?;

        Ok(Recommendation { text, links })
    }

    /// Rerank the corpus against the failure summary. Returns the best match's
    /// document and the ids of every returned match, in rank order.
    async fn similar_incidents(
        &self,
        query: &str,
    ) -> Result<(String, Vec<String>), PipelineError> {
        if self.corpus.is_empty() {
            tracing::warn!("recommendation corpus is empty, skipping rerank");
            return Ok((String::new(), Vec::new()));
        }

        let top_n = self.top_n.min(self.corpus.len());
        let request = RerankRequest {
            model: self.rerank_model.clone(),
            query: query.to_string(),
            documents: self.corpus.documents().to_vec(),
            top_n,
        };

        let mut results = self.reranker.rerank(&request).await?;
        results.truncate(top_n);

        let links = results
            .iter()
            .map(|result| {
                self.corpus
                    .id_at(result.index)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ServiceError::parsing(format!(
                            "rerank returned unknown document index {}",
                            result.index
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let docs = results
            .first()
            .and_then(|best| {
                best.document
                    .clone()
                    .or_else(|| self.corpus.document(best.index).map(str::to_string))
            })
            .unwrap_or_default();

        tracing::debug!(matches = links.len(), ?links, "reranked historical incidents");
        Ok((docs, links))
    }
}

/// `"<stage>:\n<summary>"` blocks joined by blank lines. Stages without a
/// summary are left out.
pub fn format_summaries(summaries: &Map<String, Value>) -> String {
    summaries
        .iter()
        .filter_map(|(stage, summary)| {
            summary_text(summary).map(|text| format!("{}:\n{}", stage, text))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn summary_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_summaries_keeps_request_order() {
        let summaries = json!({
            "Page Load": "Page loaded.",
            "Render Failure": "Creative 503."
        });
        let formatted = format_summaries(summaries.as_object().unwrap());
        assert_eq!(formatted, "Page Load:\nPage loaded.\n\nRender Failure:\nCreative 503.");
    }

    #[test]
    fn test_format_summaries_skips_missing_stages() {
        let summaries = json!({
            "Page Load": null,
            "Bid Start": "  ",
            "Render Failure": "Creative 503."
        });
        let formatted = format_summaries(summaries.as_object().unwrap());
        assert_eq!(formatted, "Render Failure:\nCreative 503.");
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!({})));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!(false)));
        assert!(is_empty(&json!(0)));
        assert!(is_empty(&json!(0.0)));
        assert!(!is_empty(&json!(true)));
        assert!(!is_empty(&json!(7)));
        assert!(!is_empty(&json!({"title": "Page Load"})));
    }
}
