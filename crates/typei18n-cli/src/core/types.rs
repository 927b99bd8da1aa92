use std::time::Duration;
use typei18n_build::{CompilationReport, GenerationOutcome};

/// How a build cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleStatus {
    /// Locales unchanged, or no locales at all.
    UpToDate,
    Generated,
    Failed,
}

impl From<&GenerationOutcome> for CycleStatus {
    fn from(outcome: &GenerationOutcome) -> Self {
        match outcome {
            GenerationOutcome::Skipped => Self::UpToDate,
            GenerationOutcome::Succeeded => Self::Generated,
            GenerationOutcome::Failed(_) => Self::Failed,
        }
    }
}

/// Result of one build cycle, after the host collected its diagnostics.
#[derive(Debug)]
pub struct CycleSummary {
    pub status: CycleStatus,
    /// How long the cycle took.
    pub duration: Duration,
    pub report: CompilationReport,
}
