//! RAGWATCH Core Library
//!
//! Staged evaluation of retrieval-augmented question answering: the four
//! stage evaluators, the session orchestrator, running metrics and the
//! human-readable session report.

pub mod collaborators;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod memory;
pub mod obs;
pub mod pipeline;
pub mod reporting;
pub mod stage;
pub mod stages;
pub mod telemetry;

pub use collaborators::{Answerer, DenylistClassifier, LlmClient, LlmReply, SafetyClassifier};

pub use config::{SessionConfig, API_KEY_ENV, DEFAULT_API_BASE_URL};

pub use domain::{
    EvalError, EvaluationMetrics, EvaluationSummary, ExecutionVerdict, InputVerdict,
    InteractionLog, InteractionRecord, OutputVerdict, Result, ToolInvocation, ValidationVerdict,
};

pub use memory::ConversationBuffer;

pub use pipeline::{
    EvaluationOutcome, EvaluationSession, InteractionResult, SessionSnapshot, BLOCKED_MESSAGE,
};

pub use reporting::{ReportMode, ReportWriter};

pub use stage::Stage;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
