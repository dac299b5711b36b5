//! Evaluation session orchestrator.
//!
//! An [`EvaluationSession`] owns the metrics, the interaction log and the
//! conversation buffer for one interactive session. Each call to
//! [`EvaluationSession::evaluate`] drives a query through the four stages
//! around the answering call:
//!
//! ```text
//! Stage1 ─┬─ harmful ──────────────> Blocked
//!         └─ Stage2 ─> Answering ─┬─ error ─> Failed
//!                                 └─ Stage3 ─> Stage4 ─> Sealed
//! ```
//!
//! The rolling report is rewritten after every outcome. [`EvaluationSession::finalize`]
//! consumes the session and writes the final report.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::collaborators::{Answerer, LlmClient, SafetyClassifier};
use crate::config::SessionConfig;
use crate::domain::{
    EvalError, EvaluationMetrics, EvaluationSummary, InputVerdict, InteractionLog,
    InteractionRecord, Result,
};
use crate::memory::ConversationBuffer;
use crate::obs;
use crate::reporting::{self, ReportMode, ReportWriter};
use crate::stages;

/// User-facing notice returned for a blocked query.
pub const BLOCKED_MESSAGE: &str = "Harmful content detected. Query blocked for safety.";

/// Full result bundle of a sealed interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    pub interaction_id: Uuid,
    pub answer: String,
    /// Seconds from stage 1 start until the answer arrived.
    pub response_time: f64,
    pub evaluation: EvaluationSummary,
    pub overall_score: u8,
}

/// What happened to one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Completed(InteractionResult),
    Blocked {
        error: String,
        stage1_result: InputVerdict,
    },
    Failed {
        error: String,
        stage1_result: InputVerdict,
    },
}

impl EvaluationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, EvaluationOutcome::Completed(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, EvaluationOutcome::Blocked { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, EvaluationOutcome::Failed { .. })
    }

    /// Stage 1 verdict, present on every path.
    pub fn stage1(&self) -> &InputVerdict {
        match self {
            EvaluationOutcome::Completed(result) => &result.evaluation.stage1,
            EvaluationOutcome::Blocked { stage1_result, .. }
            | EvaluationOutcome::Failed { stage1_result, .. } => stage1_result,
        }
    }
}

/// Structured view of the session printed by the `report` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub summary_metrics: EvaluationMetrics,
    pub success_rate_percentage: f64,
    pub total_interactions: usize,
    pub recent_interactions: Vec<InteractionRecord>,
}

/// State for one interactive evaluation session.
pub struct EvaluationSession {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    span: tracing::Span,
    judge: Arc<dyn LlmClient>,
    answerer: Arc<dyn Answerer>,
    classifier: Box<dyn SafetyClassifier>,
    metrics: EvaluationMetrics,
    log: InteractionLog,
    memory: ConversationBuffer,
    writer: ReportWriter,
    recent_window: usize,
    snapshot_window: usize,
}

impl EvaluationSession {
    /// Open a session and write the placeholder report.
    ///
    /// The safety classifier is built from the config denylists; replace it
    /// with [`EvaluationSession::with_classifier`].
    pub fn start(
        config: &SessionConfig,
        judge: Arc<dyn LlmClient>,
        answerer: Arc<dyn Answerer>,
    ) -> Self {
        let session_id = Uuid::new_v4();
        let started_at = Utc::now();
        let writer = ReportWriter::new(&config.report_path, config.atomic_report_writes);
        let span = obs::session_span(&session_id.to_string());

        span.in_scope(|| {
            obs::emit_session_started(
                &session_id.to_string(),
                &writer.path().display().to_string(),
            );
            writer.write_soft(
                &reporting::render_session_started(started_at),
                ReportMode::SessionStarted,
            );
        });

        Self {
            session_id,
            started_at,
            span,
            judge,
            answerer,
            classifier: Box::new(config.classifier()),
            metrics: EvaluationMetrics::new(),
            log: InteractionLog::new(),
            memory: ConversationBuffer::new(),
            writer,
            recent_window: config.recent_interactions,
            snapshot_window: config.snapshot_interactions,
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn SafetyClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn metrics(&self) -> &EvaluationMetrics {
        &self.metrics
    }

    pub fn log(&self) -> &InteractionLog {
        &self.log
    }

    pub fn report_path(&self) -> &Path {
        self.writer.path()
    }

    /// Run one query through the stages.
    ///
    /// Blocked and failed queries are outcomes, not errors. The only error
    /// is [`EvalError::EmptyQuery`], returned before any state changes.
    pub async fn evaluate(&mut self, query: &str) -> Result<EvaluationOutcome> {
        if query.trim().is_empty() {
            return Err(EvalError::EmptyQuery);
        }

        let span = self.span.clone();
        let outcome = self.run_stages(query).instrument(span).await;
        self.write_rolling_report();
        Ok(outcome)
    }

    async fn run_stages(&mut self, query: &str) -> EvaluationOutcome {
        let started = Instant::now();

        let stage1 = stages::evaluate_input(
            query,
            self.classifier.as_ref(),
            self.judge.as_ref(),
            &mut self.metrics,
        )
        .await;

        if stage1.harmful_content {
            obs::emit_query_blocked(query);
            return EvaluationOutcome::Blocked {
                error: BLOCKED_MESSAGE.to_string(),
                stage1_result: stage1,
            };
        }

        let stage2 = stages::monitor_execution(query, &mut self.memory);

        let answer = match self.answerer.answer(query).await {
            Ok(answer) => answer,
            Err(e) => {
                self.metrics.record_failure();
                obs::emit_query_failed(query, &e);
                return EvaluationOutcome::Failed {
                    error: e.to_string(),
                    stage1_result: stage1,
                };
            }
        };
        let response_time = started.elapsed().as_secs_f64();

        let stage3 = stages::evaluate_output(
            query,
            &answer,
            response_time,
            self.judge.as_ref(),
            &mut self.metrics,
        )
        .await;
        let stage4 = stages::validate_final(query, &answer, &stage3, self.judge.as_ref()).await;

        self.metrics.record_success(response_time);

        let evaluation = EvaluationSummary {
            stage1,
            stage2,
            stage3,
            stage4,
        };
        let overall_score = evaluation.stage4.response_quality_score;
        let record =
            InteractionRecord::sealed(query, answer.as_str(), response_time, evaluation.clone());
        let interaction_id = record.interaction_id;
        self.log.append(record);

        obs::emit_query_sealed(&interaction_id.to_string(), response_time, overall_score);

        EvaluationOutcome::Completed(InteractionResult {
            interaction_id,
            answer,
            response_time,
            evaluation,
            overall_score,
        })
    }

    fn write_rolling_report(&self) {
        let text = reporting::render_rolling(
            &self.metrics,
            &self.log,
            self.started_at,
            Utc::now(),
            self.recent_window,
        );
        self.writer.write_soft(&text, ReportMode::Rolling);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            summary_metrics: self.metrics.clone(),
            success_rate_percentage: self.metrics.success_rate(),
            total_interactions: self.log.len(),
            recent_interactions: self
                .log
                .recent(self.snapshot_window)
                .map(|(_, record)| record.clone())
                .collect(),
        }
    }

    /// Write the final report and close the session.
    ///
    /// Returns the final counters.
    pub fn finalize(self) -> EvaluationMetrics {
        let _span = obs::SessionSpan::enter(&self.session_id.to_string());

        let text = reporting::render_final(&self.metrics, &self.log, self.started_at, Utc::now());
        self.writer.write_soft(&text, ReportMode::Final);
        self.metrics.flush();

        obs::emit_session_finalized(
            &self.session_id.to_string(),
            self.metrics.total_queries,
            self.log.len(),
        );
        self.metrics
    }
}
