//! Stage 3: output generation evaluation.

use tracing::{info, warn};

use crate::collaborators::LlmClient;
use crate::domain::{EvaluationMetrics, OutputVerdict};
use crate::obs;
use crate::stage::Stage;

pub fn hallucination_prompt(query: &str, answer: &str) -> String {
    format!(
        "Based on the context provided and the question asked, does this response contain any \
         hallucinated or fabricated information?\n\n\
         Question: {}\n\
         Response: {}\n\n\
         Answer with 'Yes' if hallucination detected, 'No' if response seems accurate.",
        query, answer
    )
}

/// False when either side of the exchange is blank.
pub fn handles_edge_cases(query: &str, answer: &str) -> bool {
    !query.trim().is_empty() && !answer.trim().is_empty()
}

pub async fn evaluate_output(
    query: &str,
    answer: &str,
    response_time_secs: f64,
    judge: &dyn LlmClient,
    metrics: &mut EvaluationMetrics,
) -> OutputVerdict {
    obs::emit_stage_entered(Stage::OutputQuality);

    let mut verdict = OutputVerdict {
        hallucination_detected: false,
        response_time_ms: response_time_secs * 1000.0,
        edge_case_handling: true,
        fact_check_result: None,
    };

    match judge.invoke(&hallucination_prompt(query, answer)).await {
        Ok(reply) if reply.says_yes() => {
            verdict.hallucination_detected = true;
            metrics.record_hallucination();
            let preview: String = answer.chars().take(100).collect();
            warn!(response = %preview, "hallucination detected in response");
        }
        Ok(_) => {}
        Err(e) => obs::emit_judge_unavailable(Stage::OutputQuality, "hallucination", &e),
    }

    info!(response_time_secs = response_time_secs, "response generated");

    if !handles_edge_cases(query, answer) {
        verdict.edge_case_handling = false;
        warn!("edge case detected: empty input or response");
    }

    verdict
}
