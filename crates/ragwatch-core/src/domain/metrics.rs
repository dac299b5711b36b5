//! Session-wide evaluation counters.
//!
//! One [`EvaluationMetrics`] lives inside each `EvaluationSession`. Counters
//! are mutated only by the session while it processes a query. Call
//! [`EvaluationMetrics::flush`] to emit the current values as a single
//! `tracing::info!` event.

use serde::{Deserialize, Serialize};

/// Running counters for one evaluation session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub total_queries: u64,
    pub successful_responses: u64,
    pub failed_responses: u64,
    /// Mean response time in seconds over successful responses only.
    pub avg_response_time: f64,
    pub hallucination_count: u64,
    pub ambiguous_queries: u64,
    pub harmful_content_detected: u64,
}

impl EvaluationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a completed query and fold its response time into the mean.
    pub fn record_success(&mut self, response_time_secs: f64) {
        self.total_queries += 1;
        self.successful_responses += 1;
        let n = self.successful_responses as f64;
        self.avg_response_time = (self.avg_response_time * (n - 1.0) + response_time_secs) / n;
    }

    /// Count a query whose answering call failed.
    pub fn record_failure(&mut self) {
        self.total_queries += 1;
        self.failed_responses += 1;
    }

    pub fn record_harmful(&mut self) {
        self.harmful_content_detected += 1;
    }

    pub fn record_ambiguous(&mut self) {
        self.ambiguous_queries += 1;
    }

    pub fn record_hallucination(&mut self) {
        self.hallucination_count += 1;
    }

    /// Successful responses as a percentage of all counted queries.
    pub fn success_rate(&self) -> f64 {
        if self.total_queries == 0 {
            return 0.0;
        }
        self.successful_responses as f64 / self.total_queries as f64 * 100.0
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            total_queries = self.total_queries,
            successful_responses = self.successful_responses,
            failed_responses = self.failed_responses,
            avg_response_time = self.avg_response_time,
            hallucination_count = self.hallucination_count,
            ambiguous_queries = self.ambiguous_queries,
            harmful_content_detected = self.harmful_content_detected,
        );
    }
}
