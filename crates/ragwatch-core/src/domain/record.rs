//! Sealed interaction records and the append-only interaction log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::verdict::EvaluationSummary;

/// Immutable record of one processed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub interaction_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub agent_response: Option<String>,
    /// Seconds from stage 1 start until the answer arrived.
    pub response_time: Option<f64>,
    pub evaluation_summary: Option<EvaluationSummary>,
    pub overall_score: Option<u8>,
}

impl InteractionRecord {
    /// Seal a fully evaluated interaction.
    pub fn sealed(
        user_input: impl Into<String>,
        agent_response: impl Into<String>,
        response_time: f64,
        summary: EvaluationSummary,
    ) -> Self {
        let overall_score = summary.stage4.response_quality_score;
        Self {
            interaction_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_input: user_input.into(),
            agent_response: Some(agent_response.into()),
            response_time: Some(response_time),
            evaluation_summary: Some(summary),
            overall_score: Some(overall_score),
        }
    }
}

/// Append-only ordered log of sealed interactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionLog {
    records: Vec<InteractionRecord>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: InteractionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    /// The last `n` records in order, paired with their 1-based position.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = (usize, &InteractionRecord)> {
        let start = self.records.len().saturating_sub(n);
        self.records
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, r)| (i + 1, r))
    }

    /// Records that carry a per-stage summary.
    pub fn summarized(&self) -> impl Iterator<Item = &EvaluationSummary> {
        self.records
            .iter()
            .filter_map(|r| r.evaluation_summary.as_ref())
    }
}
