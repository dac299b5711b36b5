//! Human-readable session report rendering and persistence.
//!
//! Rendering is pure: every function takes the metrics, the interaction log
//! and explicit timestamps and returns the full report text. [`ReportWriter`]
//! overwrites the single report artifact with that text.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::domain::{EvalError, EvaluationMetrics, InteractionLog, InteractionRecord, Result};
use crate::obs;
use crate::stage::Stage;

/// Question and answer text in the final report are cut to this many chars.
pub const FINAL_TEXT_LIMIT: usize = 100;

const WIDTH: usize = 80;

/// Which report layout is being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    SessionStarted,
    Rolling,
    Final,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::SessionStarted => "session_started",
            ReportMode::Rolling => "rolling",
            ReportMode::Final => "final",
        }
    }
}

fn heavy_rule() -> String {
    "=".repeat(WIDTH)
}

fn rule(width: usize) -> String {
    "-".repeat(width)
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Truncate to `limit` characters, appending `...` when anything was cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str("...");
    out
}

fn fmt_response_time(record: &InteractionRecord) -> String {
    match record.response_time {
        Some(secs) => format!("{:.2}s", secs),
        None => "N/A".to_string(),
    }
}

fn fmt_score(record: &InteractionRecord) -> String {
    match record.overall_score {
        Some(score) => score.to_string(),
        None => "N/A".to_string(),
    }
}

fn push_metrics(out: &mut String, title: &str, rule_width: usize, metrics: &EvaluationMetrics) {
    out.push_str(&format!("{}:\n", title));
    out.push_str(&format!("{}\n", rule(rule_width)));
    out.push_str(&format!("Total Queries Processed: {}\n", metrics.total_queries));
    out.push_str(&format!("Successful Responses: {}\n", metrics.successful_responses));
    out.push_str(&format!("Failed Responses: {}\n", metrics.failed_responses));
    out.push_str(&format!("Success Rate: {:.2}%\n", metrics.success_rate()));
    out.push_str(&format!(
        "Average Response Time: {:.2} seconds\n",
        metrics.avg_response_time
    ));
    out.push_str(&format!("Hallucinations Detected: {}\n", metrics.hallucination_count));
    out.push_str(&format!("Ambiguous Queries: {}\n", metrics.ambiguous_queries));
    out.push_str(&format!(
        "Harmful Content Blocked: {}\n",
        metrics.harmful_content_detected
    ));
    out.push('\n');
}

/// Placeholder written when a session starts.
pub fn render_session_started(session_start: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str("AI AGENT EVALUATION SESSION STARTED\n");
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str(&format!("Session Start: {}\n", fmt_ts(session_start)));
    out.push_str("Status: Session in progress...\n");
    out.push_str(&format!("{}\n", rule(WIDTH)));
    out.push_str("Waiting for user interactions...\n");
    out.push_str(&format!("{}\n", heavy_rule()));
    out
}

/// Rolling report: metrics plus the last `recent` interactions.
///
/// Only the `Last Updated` line depends on `now`.
pub fn render_rolling(
    metrics: &EvaluationMetrics,
    log: &InteractionLog,
    session_start: DateTime<Utc>,
    now: DateTime<Utc>,
    recent: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str("AI AGENT EVALUATION RESULTS\n");
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str(&format!("Session Start: {}\n", fmt_ts(session_start)));
    out.push_str(&format!("Last Updated: {}\n", fmt_ts(now)));
    out.push_str(&format!("{}\n", rule(WIDTH)));
    out.push('\n');

    push_metrics(&mut out, "OVERALL SESSION METRICS", 30, metrics);

    out.push_str("RECENT INTERACTIONS:\n");
    out.push_str(&format!("{}\n", rule(30)));
    if log.is_empty() {
        out.push_str("No completed interactions yet.\n");
    }
    for (position, record) in log.recent(recent) {
        out.push_str(&format!("\nInteraction #{}:\n", position));
        out.push_str(&format!("Time: {}\n", record.timestamp.to_rfc3339()));
        out.push_str(&format!("Question: {}\n", record.user_input));
        out.push_str(&format!("Response Time: {}\n", fmt_response_time(record)));

        if let Some(summary) = &record.evaluation_summary {
            out.push_str(&format!("Quality Score: {}/10\n", fmt_score(record)));
            out.push_str("Stage Results:\n");
            for stage in Stage::ALL {
                let (pass, fail) = stage.outcome_words();
                let word = if summary.passed(stage) { pass } else { fail };
                out.push_str(&format!(
                    "  Stage {} ({}): {}\n",
                    stage.number(),
                    stage.label(),
                    word
                ));
            }
        }
        out.push_str(&format!("{}\n", rule(40)));
    }

    out.push_str(&format!("{}\n", heavy_rule()));
    out
}

/// Final report: full history, per-stage pass rates and score distribution.
pub fn render_final(
    metrics: &EvaluationMetrics,
    log: &InteractionLog,
    session_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str("FINAL AI AGENT EVALUATION REPORT\n");
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str(&format!(
        "Session Duration: {} to {}\n",
        fmt_ts(session_start),
        fmt_ts(now)
    ));
    let minutes = (now - session_start).num_milliseconds() as f64 / 60_000.0;
    out.push_str(&format!("Total Session Time: {:.2} minutes\n", minutes));
    out.push_str(&format!("{}\n", rule(WIDTH)));
    out.push('\n');

    push_metrics(&mut out, "COMPREHENSIVE SESSION METRICS", 40, metrics);

    out.push_str("STAGE-WISE PERFORMANCE ANALYSIS:\n");
    out.push_str(&format!("{}\n", rule(40)));
    let summaries: Vec<_> = log.summarized().collect();
    if summaries.is_empty() {
        out.push_str("No successful interactions to analyze.\n");
    } else {
        let total = summaries.len() as f64;
        for stage in Stage::ALL {
            let passed = summaries.iter().filter(|s| s.passed(stage)).count() as f64;
            out.push_str(&format!(
                "Stage {} ({}): {:.1}% {}\n",
                stage.number(),
                stage.label(),
                passed / total * 100.0,
                stage.rate_noun()
            ));
        }
    }
    out.push('\n');

    let scores: Vec<u8> = log
        .records()
        .iter()
        .filter_map(|r| r.overall_score)
        .collect();
    if let (Some(max), Some(min)) = (scores.iter().max(), scores.iter().min()) {
        let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64;
        out.push_str("QUALITY SCORE DISTRIBUTION:\n");
        out.push_str(&format!("{}\n", rule(30)));
        out.push_str(&format!("Average Quality Score: {:.2}/10\n", mean));
        out.push_str(&format!("Highest Score: {}/10\n", max));
        out.push_str(&format!("Lowest Score: {}/10\n", min));
        out.push('\n');
    }

    out.push_str("ALL INTERACTIONS LOG:\n");
    out.push_str(&format!("{}\n", rule(30)));
    for (i, record) in log.records().iter().enumerate() {
        out.push_str(&format!("\nInteraction #{}:\n", i + 1));
        out.push_str(&format!("Time: {}\n", record.timestamp.to_rfc3339()));
        out.push_str(&format!(
            "Question: {}\n",
            truncate_chars(&record.user_input, FINAL_TEXT_LIMIT)
        ));
        if let Some(answer) = &record.agent_response {
            out.push_str(&format!("Answer: {}\n", truncate_chars(answer, FINAL_TEXT_LIMIT)));
        }
        out.push_str(&format!("Response Time: {}\n", fmt_response_time(record)));

        if let Some(summary) = &record.evaluation_summary {
            out.push_str(&format!("Quality Score: {}/10\n", fmt_score(record)));
            let glyphs: Vec<String> = Stage::ALL
                .iter()
                .map(|&stage| {
                    let glyph = if summary.passed(stage) { '✓' } else { '✗' };
                    format!("S{}:{}", stage.number(), glyph)
                })
                .collect();
            out.push_str(&format!("Stage Results: {}\n", glyphs.join(" ")));
        }
        out.push_str(&format!("{}\n", rule(50)));
    }

    out.push_str(&format!("\nFinal report generated at: {}\n", fmt_ts(now)));
    out.push_str(&format!("{}\n", heavy_rule()));
    out
}

/// Overwrites the single report artifact.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
    atomic: bool,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>, atomic: bool) -> Self {
        Self {
            path: path.into(),
            atomic,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the artifact with `contents`.
    pub fn write(&self, contents: &str, mode: ReportMode) -> Result<()> {
        let result = if self.atomic {
            write_atomic(&self.path, contents)
        } else {
            std::fs::write(&self.path, contents)
        };
        result.map_err(|source| EvalError::ReportWrite {
            path: self.path.display().to_string(),
            source,
        })?;

        obs::emit_report_written(
            &self.path.display().to_string(),
            mode.as_str(),
            contents.len(),
        );
        Ok(())
    }

    /// Like [`ReportWriter::write`], but failures are logged and swallowed.
    pub fn write_soft(&self, contents: &str, mode: ReportMode) {
        if let Err(e) = self.write(contents, mode) {
            obs::emit_report_write_error(&self.path.display().to_string(), &e);
        }
    }
}

fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Temp file in the same directory so the rename stays on one filesystem.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EvaluationSummary, ExecutionVerdict, InputVerdict, OutputVerdict, ValidationVerdict,
    };
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, h, m, s).unwrap()
    }

    fn summary(hallucinated: bool, format_valid: bool, score: u8) -> EvaluationSummary {
        EvaluationSummary {
            stage1: InputVerdict::default(),
            stage2: ExecutionVerdict {
                action_sequence: vec![],
                tools_called: vec![],
                memory_context: None,
                execution_successful: true,
            },
            stage3: OutputVerdict {
                hallucination_detected: hallucinated,
                response_time_ms: 1000.0,
                edge_case_handling: true,
                fact_check_result: None,
            },
            stage4: ValidationVerdict {
                task_completed: true,
                response_quality_score: score,
                format_valid,
                efficiency_score: 10,
            },
        }
    }

    fn sample_log() -> (EvaluationMetrics, InteractionLog) {
        let mut metrics = EvaluationMetrics::new();
        let mut log = InteractionLog::new();
        metrics.record_success(1.0);
        log.append(InteractionRecord::sealed(
            "What is the refund window?",
            "Refunds are accepted within 30 days.",
            1.0,
            summary(false, true, 8),
        ));
        metrics.record_success(2.0);
        metrics.record_hallucination();
        log.append(InteractionRecord::sealed(
            "Who founded it?",
            "Nobody",
            2.0,
            summary(true, false, 4),
        ));
        (metrics, log)
    }

    #[test]
    fn truncate_appends_ellipsis_only_when_cut() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
    }

    #[test]
    fn session_started_report_mentions_waiting() {
        let text = render_session_started(at(9, 0, 0));
        assert!(text.contains("AI AGENT EVALUATION SESSION STARTED"));
        assert!(text.contains("Session Start: 2026-01-01 09:00:00"));
        assert!(text.contains("Waiting for user interactions..."));
    }

    #[test]
    fn session_started_layout_is_exact() {
        let heavy = "=".repeat(80);
        let expected = format!(
            "{h}\nAI AGENT EVALUATION SESSION STARTED\n{h}\n\
             Session Start: 2026-01-01 09:00:00\n\
             Status: Session in progress...\n{l}\n\
             Waiting for user interactions...\n{h}\n",
            h = heavy,
            l = "-".repeat(80)
        );
        assert_eq!(render_session_started(at(9, 0, 0)), expected);
    }

    #[test]
    fn metrics_block_lines_end_with_newlines() {
        let (metrics, log) = sample_log();
        let text = render_rolling(&metrics, &log, at(9, 0, 0), at(9, 5, 0), 5);
        assert!(text.contains(
            "OVERALL SESSION METRICS:\n------------------------------\n\
             Total Queries Processed: 2\nSuccessful Responses: 2\n"
        ));
        assert!(text.contains("Harmful Content Blocked: 0\n\nRECENT INTERACTIONS:\n"));
        assert!(text.ends_with(&format!("{}\n", "=".repeat(80))));
    }

    #[test]
    fn rolling_report_shows_metrics_and_stage_words() {
        let (metrics, log) = sample_log();
        let text = render_rolling(&metrics, &log, at(9, 0, 0), at(9, 5, 0), 5);

        assert!(text.contains("Total Queries Processed: 2"));
        assert!(text.contains("Success Rate: 100.00%"));
        assert!(text.contains("Average Response Time: 1.50 seconds"));
        assert!(text.contains("Hallucinations Detected: 1"));
        assert!(text.contains("Interaction #2:"));
        assert!(text.contains("Quality Score: 4/10"));
        assert!(text.contains("  Stage 1 (Input Safety): PASS"));
        assert!(text.contains("  Stage 3 (Output Quality): HALLUCINATION DETECTED"));
        assert!(text.contains("  Stage 4 (Final Validation): INVALID FORMAT"));
    }

    #[test]
    fn rolling_report_window_keeps_absolute_numbering() {
        let (metrics, log) = sample_log();
        let text = render_rolling(&metrics, &log, at(9, 0, 0), at(9, 5, 0), 1);
        assert!(!text.contains("Interaction #1:"));
        assert!(text.contains("Interaction #2:"));
    }

    #[test]
    fn rolling_report_is_idempotent_except_last_updated() {
        let (metrics, log) = sample_log();
        let a = render_rolling(&metrics, &log, at(9, 0, 0), at(9, 5, 0), 5);
        let b = render_rolling(&metrics, &log, at(9, 0, 0), at(9, 5, 0), 5);
        assert_eq!(a, b);

        let c = render_rolling(&metrics, &log, at(9, 0, 0), at(9, 7, 30), 5);
        let differing: Vec<(&str, &str)> = a
            .lines()
            .zip(c.lines())
            .filter(|(x, y)| x != y)
            .collect();
        assert_eq!(a.lines().count(), c.lines().count());
        assert_eq!(differing.len(), 1);
        assert!(differing[0].0.starts_with("Last Updated:"));
    }

    #[test]
    fn rolling_report_without_interactions() {
        let text = render_rolling(
            &EvaluationMetrics::new(),
            &InteractionLog::new(),
            at(9, 0, 0),
            at(9, 0, 1),
            5,
        );
        assert!(text.contains("Success Rate: 0.00%"));
        assert!(text.contains("No completed interactions yet."));
    }

    #[test]
    fn final_report_aggregates_pass_rates_and_scores() {
        let (metrics, log) = sample_log();
        let text = render_final(&metrics, &log, at(9, 0, 0), at(9, 30, 0));

        assert!(text.contains("Session Duration: 2026-01-01 09:00:00 to 2026-01-01 09:30:00"));
        assert!(text.contains("Total Session Time: 30.00 minutes"));
        assert!(text.contains("Stage 1 (Input Safety): 100.0% pass rate"));
        assert!(text.contains("Stage 2 (Core Execution): 100.0% success rate"));
        assert!(text.contains("Stage 3 (Output Quality): 50.0% quality rate"));
        assert!(text.contains("Stage 4 (Final Validation): 50.0% validation rate"));
        assert!(text.contains("Average Quality Score: 6.00/10"));
        assert!(text.contains("Highest Score: 8/10"));
        assert!(text.contains("Lowest Score: 4/10"));
        assert!(text.contains("Stage Results: S1:✓ S2:✓ S3:✗ S4:✗"));
        assert!(text.contains("Final report generated at: 2026-01-01 09:30:00"));
    }

    #[test]
    fn final_report_truncates_long_text() {
        let mut metrics = EvaluationMetrics::new();
        let mut log = InteractionLog::new();
        metrics.record_success(0.5);
        let long_answer = "x".repeat(150);
        log.append(InteractionRecord::sealed(
            "q",
            long_answer.clone(),
            0.5,
            summary(false, true, 9),
        ));

        let text = render_final(&metrics, &log, at(9, 0, 0), at(9, 1, 0));
        let expected = format!("Answer: {}...", "x".repeat(100));
        assert!(text.contains(&expected));
        assert!(!text.contains(&long_answer));
    }

    #[test]
    fn final_report_without_interactions() {
        let text = render_final(
            &EvaluationMetrics::new(),
            &InteractionLog::new(),
            at(9, 0, 0),
            at(9, 0, 0),
        );
        assert!(text.contains("No successful interactions to analyze."));
        assert!(!text.contains("QUALITY SCORE DISTRIBUTION"));
    }

    #[test]
    fn writer_overwrites_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        let writer = ReportWriter::new(&path, false);

        writer.write("first version\n", ReportMode::Rolling).unwrap();
        writer.write("second\n", ReportMode::Rolling).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn atomic_writer_overwrites_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        let writer = ReportWriter::new(&path, true);

        writer.write("one\n", ReportMode::Rolling).unwrap();
        writer.write("two\n", ReportMode::Final).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two\n");
    }

    #[test]
    fn writer_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("result.txt");
        let writer = ReportWriter::new(&path, false);

        let err = writer
            .write("text", ReportMode::Rolling)
            .expect_err("parent directory does not exist");
        assert!(matches!(err, EvalError::ReportWrite { .. }));

        // Soft writes swallow the same failure.
        writer.write_soft("text", ReportMode::Rolling);
    }
}
