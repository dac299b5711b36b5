//! Collaborator trait definitions for RAGWATCH
//!
//! These traits define the external boundaries of the evaluation pipeline:
//! - `LlmClient`: free-text completion; the judge oracle for stage checks
//! - `Answerer`: retrieval-grounded answering for a user query
//! - `SafetyClassifier`: input screening for harmful content and injection
//!
//! `LlmClient` and `Answerer` are async and backend-agnostic. Scripted fakes
//! are provided for testing via the `fakes` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Result;

// ---------------------------------------------------------------------------
// LlmClient: judge oracle
// ---------------------------------------------------------------------------

/// Completion returned by a language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmReply {
    pub content: String,
}

impl LlmReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Case-insensitive check for an affirmative "yes" anywhere in the reply.
    pub fn says_yes(&self) -> bool {
        self.content.to_lowercase().contains("yes")
    }
}

/// Language model invoked with a natural-language prompt.
///
/// Failures (network, quota, parse) are reported as `EvalError::Llm`; the
/// pipeline treats them as non-fatal and falls back to stage defaults.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<LlmReply>;
}

// ---------------------------------------------------------------------------
// Answerer: retrieval-augmented answering
// ---------------------------------------------------------------------------

/// Produces an answer grounded in retrieved context.
///
/// Any error moves the interaction to the failed path.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, query: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// SafetyClassifier: stage 1 screening
// ---------------------------------------------------------------------------

/// Synchronous input screen used by stage 1.
pub trait SafetyClassifier: Send + Sync {
    fn is_harmful(&self, query: &str) -> bool;

    fn is_injection(&self, query: &str) -> bool;
}

pub const DEFAULT_HARMFUL_KEYWORDS: &[&str] = &["hack", "kill", "bomb", "violence", "illegal"];

pub const DEFAULT_INJECTION_PATTERNS: &[&str] = &[
    "ignore previous",
    "forget instructions",
    "act as",
    "pretend you are",
];

/// Case-insensitive substring denylist screen.
///
/// This is a placeholder policy, not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenylistClassifier {
    harmful_keywords: Vec<String>,
    injection_patterns: Vec<String>,
}

impl Default for DenylistClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_HARMFUL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_INJECTION_PATTERNS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl DenylistClassifier {
    /// Entries are lowercased; blank entries are dropped since they would match every query.
    pub fn new(harmful_keywords: Vec<String>, injection_patterns: Vec<String>) -> Self {
        Self {
            harmful_keywords: Self::normalize(harmful_keywords),
            injection_patterns: Self::normalize(injection_patterns),
        }
    }

    fn normalize(entries: Vec<String>) -> Vec<String> {
        entries
            .into_iter()
            .filter(|e| !e.trim().is_empty())
            .map(|e| e.to_lowercase())
            .collect()
    }

    fn matches_any(list: &[String], query: &str) -> bool {
        let lowered = query.to_lowercase();
        list.iter().any(|needle| lowered.contains(needle.as_str()))
    }
}

impl SafetyClassifier for DenylistClassifier {
    fn is_harmful(&self, query: &str) -> bool {
        Self::matches_any(&self.harmful_keywords, query)
    }

    fn is_injection(&self, query: &str) -> bool {
        Self::matches_any(&self.injection_patterns, query)
    }
}
