//! Evaluation stage identities.

use serde::{Deserialize, Serialize};

/// The four sequential evaluation stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Input logging, harmful content, ambiguity, prompt injection.
    InputSafety,

    /// Action sequence, tool calls, conversation memory.
    CoreExecution,

    /// Hallucination, latency, edge cases.
    OutputQuality,

    /// Quality score, format, efficiency.
    FinalValidation,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::InputSafety,
        Stage::CoreExecution,
        Stage::OutputQuality,
        Stage::FinalValidation,
    ];

    /// 1-based stage number.
    pub fn number(&self) -> u8 {
        match self {
            Stage::InputSafety => 1,
            Stage::CoreExecution => 2,
            Stage::OutputQuality => 3,
            Stage::FinalValidation => 4,
        }
    }

    /// Get the stage name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::InputSafety => "input_safety",
            Stage::CoreExecution => "core_execution",
            Stage::OutputQuality => "output_quality",
            Stage::FinalValidation => "final_validation",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::InputSafety => "Input Safety",
            Stage::CoreExecution => "Core Execution",
            Stage::OutputQuality => "Output Quality",
            Stage::FinalValidation => "Final Validation",
        }
    }

    /// Rate noun used by the final report ("pass rate", "quality rate", ...).
    pub fn rate_noun(&self) -> &'static str {
        match self {
            Stage::InputSafety => "pass rate",
            Stage::CoreExecution => "success rate",
            Stage::OutputQuality => "quality rate",
            Stage::FinalValidation => "validation rate",
        }
    }

    /// Pass/fail words shown in the rolling report.
    pub fn outcome_words(&self) -> (&'static str, &'static str) {
        match self {
            Stage::InputSafety => ("PASS", "BLOCKED"),
            Stage::CoreExecution => ("SUCCESS", "FAILED"),
            Stage::OutputQuality => ("GOOD", "HALLUCINATION DETECTED"),
            Stage::FinalValidation => ("VALID", "INVALID FORMAT"),
        }
    }
}
