//! Stage 1: input processing and safety screening.

use tracing::{info, warn};

use crate::collaborators::{LlmClient, SafetyClassifier};
use crate::domain::{EvaluationMetrics, InputVerdict};
use crate::obs;
use crate::stage::Stage;

pub fn ambiguity_prompt(query: &str) -> String {
    format!(
        "Is this question ambiguous or unclear? Answer with 'Yes' or 'No': '{}'",
        query
    )
}

/// Screen a raw query.
///
/// Harmful and ambiguous hits bump their counters immediately. A harmful query
/// never reaches the judge, so it is not checked for ambiguity. A judge
/// failure leaves `ambiguous` false.
pub async fn evaluate_input(
    query: &str,
    classifier: &dyn SafetyClassifier,
    judge: &dyn LlmClient,
    metrics: &mut EvaluationMetrics,
) -> InputVerdict {
    obs::emit_stage_entered(Stage::InputSafety);
    info!(query = %query, "raw user input logged");

    let mut verdict = InputVerdict::default();

    if classifier.is_harmful(query) {
        verdict.harmful_content = true;
        metrics.record_harmful();
        warn!(query = %query, "harmful content detected in input");
    }

    if !verdict.harmful_content {
        match judge.invoke(&ambiguity_prompt(query)).await {
            Ok(reply) if reply.says_yes() => {
                verdict.ambiguous = true;
                metrics.record_ambiguous();
                warn!(query = %query, "ambiguous query detected");
            }
            Ok(_) => {}
            Err(e) => obs::emit_judge_unavailable(Stage::InputSafety, "ambiguity", &e),
        }
    }

    if classifier.is_injection(query) {
        verdict.prompt_injection = true;
        warn!(query = %query, "potential prompt injection detected");
    }

    verdict
}
