//! Comparison result delivered by the document-comparison service

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("Invalid comparison result: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Similarity score {0} is outside 0..=1")]
    InvalidScore(f64),
}

/// One significant change described by the changelog generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Display text
    pub description: String,
    /// Fragment used to locate the change in the diff
    #[serde(default)]
    pub search_string: String,
    /// HTML explanation; sanitize before display
    #[serde(default)]
    pub context: String,
}

/// Generated changelog. The generator may return only a `warning` (for
/// unrelated documents) or an `error`/`details` pair instead of changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Changelog {
    pub summary: String,
    pub changes: Vec<Change>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Already-computed comparison of two documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentComparisonResult {
    pub diff_text: String,
    /// Similarity in `0.0..=1.0`
    pub similarity_score: f64,
    #[serde(default)]
    pub changelog: Changelog,
    /// Set when the documents appear unrelated
    #[serde(default)]
    pub warning: bool,
}

impl DocumentComparisonResult {
    /// Parse and validate a JSON result
    pub fn from_json(json: &str) -> Result<Self, ComparisonError> {
        let result: Self = serde_json::from_str(json)?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> Result<(), ComparisonError> {
        if !(0.0..=1.0).contains(&self.similarity_score) {
            return Err(ComparisonError::InvalidScore(self.similarity_score));
        }
        Ok(())
    }

    /// Similarity formatted as a percentage with two decimals
    pub fn similarity_percent(&self) -> String {
        format!("{:.2}%", self.similarity_score * 100.0)
    }

    /// Banner text shown alongside the result, if any
    pub fn warning_message(&self) -> Option<&'static str> {
        self.warning
            .then_some("Warning: Documents appear to be significantly different")
    }
}
