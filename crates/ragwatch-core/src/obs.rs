//! Structured observability hooks for the evaluation session lifecycle.
//!
//! This module provides:
//! - Session-scoped tracing spans via `SessionSpan` RAII guard
//! - Emission functions for key lifecycle events: start, block, failure,
//!   seal, judge fallback, report write, finalize
//!
//! Events are emitted at `info!` level unless noted. For JSON output, run the
//! binary with `--json`.

use tracing::{error, info, warn};

use crate::stage::Stage;

/// RAII guard that enters a session-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = SessionSpan::enter("6f1c...");
/// // All tracing calls are now associated with session_id = "6f1c..."
/// ```
pub struct SessionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SessionSpan {
    /// Create and enter a span tagged with the session_id.
    pub fn enter(session_id: &str) -> Self {
        Self {
            _span: session_span(session_id).entered(),
        }
    }
}

/// Session span for instrumenting async work, where an entered guard
/// cannot be held across `.await`.
pub fn session_span(session_id: &str) -> tracing::Span {
    tracing::info_span!("ragwatch.session", session_id = %session_id)
}

/// Emit event: session started with the report destination.
pub fn emit_session_started(session_id: &str, report_path: &str) {
    info!(event = "session.started", session_id = %session_id, report_path = %report_path);
}

/// Emit event: stage entered for a query.
pub fn emit_stage_entered(stage: Stage) {
    info!(event = "stage.entered", stage = stage.name(), number = stage.number());
}

/// Emit event: query blocked by input safety (warning level).
pub fn emit_query_blocked(query: &str) {
    warn!(event = "query.blocked", query = %query);
}

/// Emit event: answering failed (error level).
pub fn emit_query_failed(query: &str, error: &dyn std::fmt::Display) {
    error!(event = "query.failed", query = %query, error = %error);
}

/// Emit event: interaction sealed with its timing and score.
pub fn emit_query_sealed(interaction_id: &str, response_time_secs: f64, score: u8) {
    info!(
        event = "query.sealed",
        interaction_id = %interaction_id,
        response_time_secs = response_time_secs,
        score = score,
    );
}

/// Emit event: a judge call failed and the stage fell back to its default
/// (warning level).
pub fn emit_judge_unavailable(stage: Stage, check: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "judge.unavailable",
        stage = stage.name(),
        check = %check,
        error = %error,
    );
}

/// Emit event: report artifact written.
pub fn emit_report_written(path: &str, mode: &str, bytes: usize) {
    info!(event = "report.written", path = %path, mode = %mode, bytes = bytes);
}

/// Emit event: report write failed (error level).
pub fn emit_report_write_error(path: &str, error: &dyn std::fmt::Display) {
    error!(event = "report.write_error", path = %path, error = %error);
}

/// Emit event: session finalized.
pub fn emit_session_finalized(session_id: &str, total_queries: u64, interactions: usize) {
    info!(
        event = "session.finalized",
        session_id = %session_id,
        total_queries = total_queries,
        interactions = interactions,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_span_create() {
        let _span = SessionSpan::enter("test-session-id");
    }
}
