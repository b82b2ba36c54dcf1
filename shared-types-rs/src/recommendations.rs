//! Historical recommendation corpus.
//!
//! Records are loaded once from a JSON array and kept in two index-aligned
//! forms: the structured records, used to resolve linked incident ids, and a
//! YAML rendering of each record, used as the reranking documents. Both
//! vectors are built together and never reordered independently.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::DataError;
use crate::Result;

/// A past incident and the remediation that was applied.
///
/// Field order matters: it is the key order of the rendered YAML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRecommendation {
    pub failure_summary: String,
    pub recommendation: String,
    pub id: String,
    pub timestamp: String,
}

impl HistoricalRecommendation {
    /// Render as a block-style YAML document
    pub fn to_document(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|source| DataError::Yaml {
            id: self.id.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationCorpus {
    records: Vec<HistoricalRecommendation>,
    documents: Vec<String>,
}

impl RecommendationCorpus {
    pub fn from_records(records: Vec<HistoricalRecommendation>) -> Result<Self> {
        let documents = records
            .iter()
            .map(HistoricalRecommendation::to_document)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records, documents })
    }

    /// Load the corpus from a JSON array of records. Fields other than the
    /// four known ones are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<HistoricalRecommendation> =
            serde_json::from_str(&raw).map_err(|source| DataError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "loaded recommendation corpus"
        );
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HistoricalRecommendation] {
        &self.records
    }

    /// Rendered documents, index-aligned with [`Self::records`]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn document(&self, index: usize) -> Option<&str> {
        self.documents.get(index).map(String::as_str)
    }

    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.records.get(index).map(|record| record.id.as_str())
    }
}
