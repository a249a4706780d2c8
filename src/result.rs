use crate::composer::ComposerState;
use crate::error::FailureReason;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationStatus {
    Success(Vec<u8>),
    /// `document` holds the stub for every reason except cancellation.
    Failed {
        reason: FailureReason,
        document: Option<Vec<u8>>,
    },
}

/// The outcome for one recipient.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub recipient_id: String,
    pub status: GenerationStatus,
    pub diagnostics: Vec<String>,
    pub final_state: ComposerState,
    pub elapsed: Duration,
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, GenerationStatus::Success(_))
    }

    /// The produced bytes, full document or stub.
    pub fn document(&self) -> Option<&[u8]> {
        match &self.status {
            GenerationStatus::Success(bytes) => Some(bytes),
            GenerationStatus::Failed { document, .. } => document.as_deref(),
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match &self.status {
            GenerationStatus::Success(_) => None,
            GenerationStatus::Failed { reason, .. } => Some(*reason),
        }
    }
}

/// Aggregate counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Failed results that still carry a stub document.
    pub stubs: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[GenerationResult]) -> Self {
        let mut summary = BatchSummary {
            total: results.len(),
            ..BatchSummary::default()
        };
        for result in results {
            match &result.status {
                GenerationStatus::Success(_) => summary.succeeded += 1,
                GenerationStatus::Failed { reason, document } => {
                    summary.failed += 1;
                    if *reason == FailureReason::Cancelled {
                        summary.cancelled += 1;
                    }
                    if document.is_some() {
                        summary.stubs += 1;
                    }
                }
            }
        }
        summary
    }
}
