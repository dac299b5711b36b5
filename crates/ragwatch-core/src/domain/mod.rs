//! Domain models for RAGWATCH.
//!
//! Canonical definitions for the core entities:
//! - `EvaluationMetrics`: running session counters
//! - `InteractionRecord`: sealed record of one processed query
//! - Stage verdicts grouped in `EvaluationSummary`

pub mod error;
pub mod metrics;
pub mod record;
pub mod verdict;

pub use error::{EvalError, Result};
pub use metrics::EvaluationMetrics;
pub use record::{InteractionLog, InteractionRecord};
pub use verdict::{
    EvaluationSummary, ExecutionVerdict, InputVerdict, OutputVerdict, ToolInvocation,
    ValidationVerdict,
};
