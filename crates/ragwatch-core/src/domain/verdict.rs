//! Per-stage verdicts produced by the evaluation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Stage 1 verdict: input logging and safety screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputVerdict {
    pub input_logged: bool,
    pub harmful_content: bool,
    pub ambiguous: bool,
    pub prompt_injection: bool,
}

impl Default for InputVerdict {
    fn default() -> Self {
        Self {
            input_logged: true,
            harmful_content: false,
            ambiguous: false,
            prompt_injection: false,
        }
    }
}

/// A tool invocation observed during execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub parameters: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Stage 2 verdict: execution bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionVerdict {
    pub action_sequence: Vec<String>,
    pub tools_called: Vec<ToolInvocation>,
    pub memory_context: Option<String>,
    pub execution_successful: bool,
}

/// Stage 3 verdict: output generation checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVerdict {
    pub hallucination_detected: bool,
    pub response_time_ms: f64,
    pub edge_case_handling: bool,
    pub fact_check_result: Option<String>,
}

/// Stage 4 verdict: final validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub task_completed: bool,
    /// Judge rating in `1..=10`.
    pub response_quality_score: u8,
    pub format_valid: bool,
    pub efficiency_score: u8,
}

/// One verdict per stage for a sealed interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub stage1: InputVerdict,
    pub stage2: ExecutionVerdict,
    pub stage3: OutputVerdict,
    pub stage4: ValidationVerdict,
}

impl EvaluationSummary {
    pub fn stage1_passed(&self) -> bool {
        !self.stage1.harmful_content
    }

    pub fn stage2_passed(&self) -> bool {
        self.stage2.execution_successful
    }

    pub fn stage3_passed(&self) -> bool {
        !self.stage3.hallucination_detected
    }

    pub fn stage4_passed(&self) -> bool {
        self.stage4.format_valid
    }

    pub fn passed(&self, stage: Stage) -> bool {
        match stage {
            Stage::InputSafety => self.stage1_passed(),
            Stage::CoreExecution => self.stage2_passed(),
            Stage::OutputQuality => self.stage3_passed(),
            Stage::FinalValidation => self.stage4_passed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_verdict_defaults_to_logged_and_clean() {
        let v = InputVerdict::default();
        assert!(v.input_logged);
        assert!(!v.harmful_content);
        assert!(!v.ambiguous);
        assert!(!v.prompt_injection);
    }

    #[test]
    fn summary_serializes_stage_keys() {
        let summary = EvaluationSummary {
            stage1: InputVerdict::default(),
            stage2: ExecutionVerdict {
                action_sequence: vec!["retrieval_started".to_string()],
                tools_called: vec![],
                memory_context: Some("Human: hi".to_string()),
                execution_successful: true,
            },
            stage3: OutputVerdict {
                hallucination_detected: true,
                response_time_ms: 1200.0,
                edge_case_handling: true,
                fact_check_result: None,
            },
            stage4: ValidationVerdict {
                task_completed: true,
                response_quality_score: 8,
                format_valid: false,
                efficiency_score: 10,
            },
        };

        let raw = serde_json::to_value(&summary).expect("serialize summary");
        for key in ["stage1", "stage2", "stage3", "stage4"] {
            assert!(raw.get(key).is_some(), "missing key: {}", key);
        }
        assert!(summary.stage1_passed());
        assert!(summary.stage2_passed());
        assert!(!summary.stage3_passed());
        assert!(!summary.stage4_passed());
        assert!(!summary.passed(Stage::OutputQuality));
        assert!(summary.passed(Stage::CoreExecution));
    }
}
