//! Comparison lifecycle: select → ready → comparing → complete

use crate::citation::{resolve_citations, Citation};
use crate::comparison::DocumentComparisonResult;
use crate::document::DiffDocument;
use thiserror::Error;

/// Stage of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// No inputs chosen yet
    #[default]
    Select,
    /// Inputs chosen, comparison not started
    Ready,
    /// Waiting for the result
    Comparing,
    /// Result available
    Complete,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while {stage:?}")]
    InvalidTransition { stage: Stage, action: &'static str },
}

/// State for one comparison and its derived views.
///
/// The diff document and citations are rebuilt each time a result becomes
/// active; nothing carries over between results.
#[derive(Debug, Default)]
pub struct ComparisonSession {
    stage: Stage,
    result: Option<DocumentComparisonResult>,
    document: DiffDocument,
    citations: Vec<Citation>,
    error: Option<String>,
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn result(&self) -> Option<&DocumentComparisonResult> {
        self.result.as_ref()
    }

    pub fn document(&self) -> &DiffDocument {
        &self.document
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    /// Citation line for the change at `index`
    pub fn citation_line(&self, index: usize) -> Option<usize> {
        self.citations.get(index).and_then(|c| c.line_number)
    }

    /// Last failure or warning message
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn transition(&mut self, from: Stage, to: Stage, action: &'static str) -> Result<(), SessionError> {
        if self.stage != from {
            return Err(SessionError::InvalidTransition {
                stage: self.stage,
                action,
            });
        }
        tracing::info!(?from, ?to, "comparison stage");
        self.stage = to;
        Ok(())
    }

    /// Inputs have been chosen
    pub fn prepare(&mut self) -> Result<(), SessionError> {
        self.transition(Stage::Select, Stage::Ready, "prepare")?;
        self.error = None;
        Ok(())
    }

    /// Comparison request issued
    pub fn begin(&mut self) -> Result<(), SessionError> {
        self.transition(Stage::Ready, Stage::Comparing, "begin")?;
        self.error = None;
        Ok(())
    }

    /// Result arrived; derive the document and resolve citations
    pub fn complete(&mut self, result: DocumentComparisonResult) -> Result<(), SessionError> {
        self.transition(Stage::Comparing, Stage::Complete, "complete")?;
        self.document = DiffDocument::new(&result.diff_text);
        self.citations = resolve_citations(&result.changelog.changes, &result.diff_text);
        self.error = result.warning_message().map(str::to_string);
        tracing::info!(
            lines = self.document.line_count(),
            changes = self.citations.len(),
            resolved = self.citations.iter().filter(|c| c.is_resolved()).count(),
            "comparison result loaded"
        );
        self.result = Some(result);
        Ok(())
    }

    /// Comparison failed; back to ready with the message kept
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        self.transition(Stage::Comparing, Stage::Ready, "fail")?;
        self.clear_result();
        self.error = Some(message.into());
        Ok(())
    }

    /// Discard everything and return to input selection
    pub fn start_new(&mut self) {
        tracing::info!(from = ?self.stage, "new comparison");
        self.stage = Stage::Select;
        self.clear_result();
        self.error = None;
    }

    fn clear_result(&mut self) {
        self.result = None;
        self.document = DiffDocument::default();
        self.citations.clear();
    }
}
