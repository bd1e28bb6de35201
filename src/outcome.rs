//! What the user sees after one action.

use crate::pipeline::{PipelineError, Stage};
use crate::summary::Summary;

/// Exactly one of these is rendered per action
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Missing or invalid input; nothing was fetched
    Rejected(String),
    /// The summary
    Success(Summary),
    /// A downstream stage failed
    Failed {
        stage: Stage,
        message: String,
        detail: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// One-line description for status bars
    pub fn headline(&self) -> String {
        match self {
            Outcome::Rejected(message) => message.clone(),
            Outcome::Success(summary) => format!(
                "Summarised {} ({} words, {})",
                summary.heading(),
                summary.word_count(),
                summary.model
            ),
            Outcome::Failed { stage, message, .. } => {
                format!("{} failed: {}", stage_name(*stage), message)
            }
        }
    }
}

impl From<PipelineError> for Outcome {
    fn from(err: PipelineError) -> Self {
        if err.is_input_error() {
            return Outcome::Rejected(err.to_string());
        }
        Outcome::Failed {
            stage: err.stage(),
            message: err.to_string(),
            detail: format!("{err:?}"),
        }
    }
}

impl From<Result<Summary, PipelineError>> for Outcome {
    fn from(result: Result<Summary, PipelineError>) -> Self {
        match result {
            Ok(summary) => Outcome::Success(summary),
            Err(err) => {
                tracing::warn!(error = %err, "request failed");
                err.into()
            }
        }
    }
}

fn stage_name(stage: Stage) -> &'static str {
    match stage {
        Stage::Validating => "Validation",
        Stage::Loading => "Loading",
        Stage::Summarizing => "Summarization",
    }
}
