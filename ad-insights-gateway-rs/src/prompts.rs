//! Prompt templates and the title-to-template mapping.
//!
//! Templates are plain text files with `{name}` slots. `{{` and `}}` stand
//! for literal braces; a slot with no value is an error.

use std::io::ErrorKind;
use std::path::PathBuf;

use shared_types::LogStage;
use thiserror::Error;

use crate::error::PipelineError;

/// Used for unrecognized titles and missing stage files
pub const DEFAULT_SUMMARY_PROMPT: &str = "log-page-load-v1.txt";
pub const RECOMMENDATION_PROMPT: &str = "alert-recommendation-v1.txt";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("no value for placeholder '{0}'")]
    UnknownPlaceholder(String),

    #[error("unclosed '{{' at byte {0}")]
    Unclosed(usize),

    #[error("single '}}' at byte {0}")]
    UnmatchedClose(usize),
}

/// A loaded prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: String,
    pub text: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, PipelineError> {
        render_prompt(&self.text, values).map_err(|source| PipelineError::Template {
            name: self.name.clone(),
            source,
        })
    }
}

/// Fill `{name}` slots in `template` from `values`
pub fn render_prompt(template: &str, values: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template.char_indices().peekable();

    while let Some((pos, c)) = rest.next() {
        match c {
            '{' if matches!(rest.peek(), Some((_, '{'))) => {
                rest.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in rest.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(TemplateError::Unclosed(pos));
                }

                let value = values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or(TemplateError::UnknownPlaceholder(name))?;
                out.push_str(value);
            }
            '}' if matches!(rest.peek(), Some((_, '}'))) => {
                rest.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::UnmatchedClose(pos)),
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Template file for a log title; unknown titles map to the default
pub fn summary_prompt_file(title: Option<&str>) -> String {
    title
        .and_then(LogStage::from_title)
        .map(|stage| format!("log-{}-v1.txt", stage.key()))
        .unwrap_or_else(|| DEFAULT_SUMMARY_PROMPT.to_string())
}

/// Reads prompt templates from a directory
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    dir: PathBuf,
}

impl PromptRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The summary template for a log title. A missing stage file falls back
    /// to the default template.
    pub async fn summary_prompt(
        &self,
        title: Option<&str>,
    ) -> Result<PromptTemplate, PipelineError> {
        let file = summary_prompt_file(title);

        match self.read(&file).await {
            Err(PipelineError::Io { ref source, ref path })
                if source.kind() == ErrorKind::NotFound && file != DEFAULT_SUMMARY_PROMPT =>
            {
                tracing::warn!(
                    path = %path.display(),
                    "prompt file not found, using default prompt"
                );
                self.read(DEFAULT_SUMMARY_PROMPT).await
            }
            other => other,
        }
    }

    pub async fn recommendation_prompt(&self) -> Result<PromptTemplate, PipelineError> {
        self.read(RECOMMENDATION_PROMPT).await
    }

    async fn read(&self, file: &str) -> Result<PromptTemplate, PipelineError> {
        let path = self.dir.join(file);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| PipelineError::Io { path, source })?;

        Ok(PromptTemplate::new(file, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_named_slots() {
        let out = render_prompt("Logs:\n{log_data}\nEnd", &[("log_data", "{\"a\": 1}")]).unwrap();
        assert_eq!(out, "Logs:\n{\"a\": 1}\nEnd");
    }

    #[test]
    fn test_render_escaped_braces() {
        let out = render_prompt("{{\"key\": \"{docs}\"}}", &[("docs", "x")]).unwrap();
        assert_eq!(out, "{\"key\": \"x\"}");
    }

    #[test]
    fn test_render_errors() {
        assert_eq!(
            render_prompt("{missing}", &[]),
            Err(TemplateError::UnknownPlaceholder("missing".to_string()))
        );
        assert_eq!(render_prompt("abc {open", &[]), Err(TemplateError::Unclosed(4)));
        assert_eq!(render_prompt("a } b", &[]), Err(TemplateError::UnmatchedClose(2)));
    }

    #[test]
    fn test_values_are_not_reinterpreted() {
        let out = render_prompt("{a}", &[("a", "{b} }")]).unwrap();
        assert_eq!(out, "{b} }");
    }

    #[test]
    fn test_summary_prompt_file_mapping() {
        assert_eq!(summary_prompt_file(Some("Bid Complete")), "log-bid-complete-v1.txt");
        assert_eq!(summary_prompt_file(Some("render failure")), "log-render-failure-v1.txt");
        assert_eq!(summary_prompt_file(Some("Creative Fetch")), DEFAULT_SUMMARY_PROMPT);
        assert_eq!(summary_prompt_file(None), DEFAULT_SUMMARY_PROMPT);
    }

    #[tokio::test]
    async fn test_missing_stage_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_SUMMARY_PROMPT), "default {log_data}").unwrap();

        let registry = PromptRegistry::new(dir.path());
        let prompt = registry.summary_prompt(Some("Bid Start")).await.unwrap();
        assert_eq!(prompt.name, DEFAULT_SUMMARY_PROMPT);

        assert!(registry.recommendation_prompt().await.is_err());
    }
}
