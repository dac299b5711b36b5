//! Property-based tests for session counters and the final report.

use proptest::prelude::*;

use ragwatch_core::reporting::truncate_chars;
use ragwatch_core::stages::{efficiency_score, extract_quality_score, is_format_valid};
use ragwatch_core::EvaluationMetrics;

#[derive(Debug, Clone)]
enum Event {
    Success(f64),
    Failure,
    Harmful,
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (0.0f64..30.0).prop_map(Event::Success),
        Just(Event::Failure),
        Just(Event::Harmful),
    ]
}

// --- Running average ---

proptest! {
    #[test]
    fn running_average_matches_batch_mean(times in prop::collection::vec(0.0f64..120.0, 1..64)) {
        let mut metrics = EvaluationMetrics::new();
        for &t in &times {
            metrics.record_success(t);
        }
        let mean = times.iter().sum::<f64>() / times.len() as f64;
        prop_assert!((metrics.avg_response_time - mean).abs() < 1e-9 * mean.max(1.0));
    }

    #[test]
    fn counters_stay_balanced(events in prop::collection::vec(event(), 0..64)) {
        let mut metrics = EvaluationMetrics::new();
        let mut successes = Vec::new();
        for e in &events {
            match e {
                Event::Success(t) => {
                    metrics.record_success(*t);
                    successes.push(*t);
                }
                Event::Failure => metrics.record_failure(),
                Event::Harmful => metrics.record_harmful(),
            }
            prop_assert_eq!(
                metrics.successful_responses + metrics.failed_responses,
                metrics.total_queries
            );
        }

        let rate = metrics.success_rate();
        prop_assert!((0.0..=100.0).contains(&rate));
        if !successes.is_empty() {
            let mean = successes.iter().sum::<f64>() / successes.len() as f64;
            prop_assert!((metrics.avg_response_time - mean).abs() < 1e-9 * mean.max(1.0));
        }
    }
}

// --- Stage 4 heuristics ---

proptest! {
    #[test]
    fn efficiency_score_is_monotone(a in 0.0f64..20_000.0, b in 0.0f64..20_000.0) {
        let (fast, slow) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(efficiency_score(fast) >= efficiency_score(slow));
    }

    #[test]
    fn extracted_score_is_in_range(text in ".{0,80}") {
        if let Some(score) = extract_quality_score(&text) {
            prop_assert!((1..=10).contains(&score));
        }
    }

    #[test]
    fn bare_score_is_extracted(score in 1u8..=10) {
        prop_assert_eq!(extract_quality_score(&score.to_string()), Some(score));
    }

    #[test]
    fn format_validity_tracks_trimmed_length(body in "[a-z]{0,20}", pad in 0usize..4) {
        let answer = format!("{}{}{}", " ".repeat(pad), body, "\n".repeat(pad));
        prop_assert_eq!(is_format_valid(&answer), body.chars().count() >= 10);
    }

    #[test]
    fn truncation_never_exceeds_limit(text in "\\PC{0,200}", limit in 1usize..150) {
        let out = truncate_chars(&text, limit);
        if text.chars().count() > limit {
            prop_assert!(out.ends_with("..."));
            prop_assert_eq!(out.chars().count(), limit + 3);
        } else {
            prop_assert_eq!(out, text);
        }
    }
}
