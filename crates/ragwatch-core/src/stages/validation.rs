//! Stage 4: final output validation.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::collaborators::LlmClient;
use crate::domain::{OutputVerdict, ValidationVerdict};
use crate::obs;
use crate::stage::Stage;

/// Score used when the judge is unavailable or its reply has no rating.
pub const DEFAULT_QUALITY_SCORE: u8 = 7;

/// Answers shorter than this (after trimming) fail format validation.
pub const MIN_ANSWER_CHARS: usize = 10;

pub fn quality_prompt(query: &str, answer: &str) -> String {
    format!(
        "Rate how well this response answers the user's question on a scale of 1-10:\n\n\
         Question: {}\n\
         Response: {}\n\n\
         Provide only a number from 1-10.",
        query, answer
    )
}

fn score_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b([1-9]|10)\b").expect("score pattern is valid"))
}

/// First standalone integer in `1..=10` found in the judge's reply.
pub fn extract_quality_score(text: &str) -> Option<u8> {
    score_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn is_format_valid(answer: &str) -> bool {
    answer.trim().chars().count() >= MIN_ANSWER_CHARS
}

/// Step function over response latency in milliseconds.
pub fn efficiency_score(response_time_ms: f64) -> u8 {
    if response_time_ms < 3000.0 {
        10
    } else if response_time_ms < 5000.0 {
        7
    } else {
        5
    }
}

pub async fn validate_final(
    query: &str,
    answer: &str,
    output: &OutputVerdict,
    judge: &dyn LlmClient,
) -> ValidationVerdict {
    obs::emit_stage_entered(Stage::FinalValidation);

    let response_quality_score = match judge.invoke(&quality_prompt(query, answer)).await {
        Ok(reply) => extract_quality_score(&reply.content).unwrap_or(DEFAULT_QUALITY_SCORE),
        Err(e) => {
            obs::emit_judge_unavailable(Stage::FinalValidation, "quality", &e);
            DEFAULT_QUALITY_SCORE
        }
    };

    let format_valid = is_format_valid(answer);
    if !format_valid {
        warn!("response too short, format validation failed");
    }

    ValidationVerdict {
        task_completed: true,
        response_quality_score,
        format_valid,
        efficiency_score: efficiency_score(output.response_time_ms),
    }
}
