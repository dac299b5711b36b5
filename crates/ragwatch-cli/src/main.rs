//! RAGWATCH - evaluated question answering over a document
//!
//! The `ragwatch` command indexes a text document, then answers questions
//! about it interactively. Every answer passes through the four-stage
//! evaluation gate and the session report is rewritten after each query.
//!
//! ## Commands (at the prompt)
//!
//! - `report`: print the current session snapshot as JSON
//! - `exit`: write the final report and quit
//! - anything else is asked as a question

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};

use ragwatch_core::telemetry::init_tracing;
use ragwatch_core::{
    EvaluationMetrics, EvaluationOutcome, EvaluationSession, SessionConfig, Stage, API_KEY_ENV,
};
use ragwatch_rag::{load_document, CharacterSplitter, GeminiClient, RetrievalQa, VectorStore};

const EMPTY_INPUT_NOTICE: &str = "Please enter a valid question.";

#[derive(Parser)]
#[command(name = "ragwatch")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluated retrieval-augmented question answering", long_about = None)]
struct Cli {
    /// TOML session config; missing keys keep their defaults
    #[arg(short, long, env = "RAGWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Text document to index
    #[arg(short, long, env = "RAGWATCH_DOCUMENT")]
    document: Option<PathBuf>,

    /// Report file rewritten after every query
    #[arg(short, long, env = "RAGWATCH_REPORT")]
    report: Option<PathBuf>,

    /// Diagnostic log file
    #[arg(long, env = "RAGWATCH_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Gemini model used for answers and judging
    #[arg(long, env = "RAGWATCH_MODEL")]
    model: Option<String>,

    /// Write the report through a temp file and rename
    #[arg(long)]
    atomic_reports: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

/// Defaults, then the TOML file, then flags and env vars.
fn resolve_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(document) = &cli.document {
        config.document_path = document.clone();
    }
    if let Some(report) = &cli.report {
        config.report_path = report.clone();
    }
    if let Some(log_file) = &cli.log_file {
        config.log_path = log_file.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if cli.atomic_reports {
        config.atomic_report_writes = true;
    }

    config.validate().context("Invalid session config")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let _log_guard = init_tracing(cli.json, level, Some(config.log_path.as_path()));

    let session = build_session(&config).await?;
    run_interactive(session).await
}

async fn build_session(config: &SessionConfig) -> Result<EvaluationSession> {
    let document = load_document(&config.document_path)
        .with_context(|| format!("Failed to load {}", config.document_path.display()))?;

    let splitter = CharacterSplitter::new(config.chunk_size, config.chunk_overlap)?;
    let chunks = splitter.split_text(&document.content);
    info!(source = %document.source, chunks = chunks.len(), "document split");

    let gemini = Arc::new(
        GeminiClient::from_env(config)
            .with_context(|| format!("Set {} to use the Gemini API", API_KEY_ENV))?,
    );
    let store = VectorStore::from_texts(chunks, gemini.as_ref())
        .await
        .context("Failed to embed document chunks")?;

    let qa = Arc::new(RetrievalQa::new(
        store,
        gemini.clone(),
        gemini.clone(),
        config.top_k,
    ));
    Ok(EvaluationSession::start(config, gemini, qa))
}

async fn run_interactive(mut session: EvaluationSession) -> Result<()> {
    let report_path = session.report_path().to_path_buf();

    println!("RAG agent ready. Every answer passes through:");
    for stage in Stage::ALL {
        println!("  Stage {}: {}", stage.number(), stage.label());
    }
    println!("Ask questions about the document.");
    println!("Type 'report' for session metrics or 'exit' to quit.");
    println!("Report file: {}", report_path.display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        // EOF ends the session like `exit`.
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();

        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input.eq_ignore_ascii_case("report") {
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            continue;
        }
        if input.is_empty() {
            println!("{}", EMPTY_INPUT_NOTICE);
            continue;
        }

        match session.evaluate(input).await {
            Ok(outcome) => println!("{}", format_outcome(&outcome)),
            Err(e) => println!("Error: {}", e),
        }
    }

    let metrics = session.finalize();
    println!("{}", format_summary(&metrics, &report_path));
    Ok(())
}

fn format_outcome(outcome: &EvaluationOutcome) -> String {
    match outcome {
        EvaluationOutcome::Completed(result) => {
            let mut lines = vec![
                format!("\nAgent: {}", result.answer),
                String::new(),
                format!(
                    "[Evaluation] response time {:.2}s, quality {}/10",
                    result.response_time, result.overall_score
                ),
            ];
            for stage in Stage::ALL {
                let (pass, fail) = stage.outcome_words();
                let word = if result.evaluation.passed(stage) {
                    pass
                } else {
                    fail
                };
                lines.push(format!("  Stage {} ({}): {}", stage.number(), stage.label(), word));
            }
            lines.join("\n")
        }
        EvaluationOutcome::Blocked { error, .. } => format!("\nBlocked: {}", error),
        EvaluationOutcome::Failed { error, .. } => format!("\nFailed: {}", error),
    }
}

fn format_summary(metrics: &EvaluationMetrics, report_path: &Path) -> String {
    [
        "Session ended.".to_string(),
        format!("Total Queries: {}", metrics.total_queries),
        format!("Success Rate: {:.2}%", metrics.success_rate()),
        format!(
            "Average Response Time: {:.2} seconds",
            metrics.avg_response_time
        ),
        format!("Final report written to {}", report_path.display()),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use ragwatch_core::InputVerdict;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "ragwatch",
            "--document",
            "policy.txt",
            "--report",
            "out.txt",
            "--atomic-reports",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.document_path, PathBuf::from("policy.txt"));
        assert_eq!(config.report_path, PathBuf::from("out.txt"));
        assert!(config.atomic_report_writes);
        assert_eq!(config.chunk_size, 1000);
    }

    #[test]
    fn blocked_outcome_is_distinguishable() {
        let outcome = EvaluationOutcome::Blocked {
            error: ragwatch_core::BLOCKED_MESSAGE.to_string(),
            stage1_result: InputVerdict {
                harmful_content: true,
                ..InputVerdict::default()
            },
        };
        let text = format_outcome(&outcome);
        assert!(text.contains("Blocked:"));
        assert!(!text.contains("Agent:"));
    }

    #[test]
    fn summary_lists_headline_metrics() {
        let mut metrics = EvaluationMetrics::new();
        metrics.record_success(1.5);
        metrics.record_failure();
        let text = format_summary(&metrics, Path::new("result.txt"));
        assert!(text.contains("Total Queries: 2"));
        assert!(text.contains("Success Rate: 50.00%"));
        assert!(text.contains("Average Response Time: 1.50 seconds"));
    }
}
