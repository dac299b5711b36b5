//! Session configuration.
//!
//! Resolved in layers: built-in defaults, then an optional TOML file, then
//! CLI flags and environment variables applied by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collaborators::{
    DenylistClassifier, DEFAULT_HARMFUL_KEYWORDS, DEFAULT_INJECTION_PATTERNS,
};
use crate::domain::{EvalError, Result};

/// Default Gemini REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the model API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Text document loaded once at session start.
    pub document_path: PathBuf,
    /// Report artifact, fully rewritten on every update.
    pub report_path: PathBuf,
    /// Diagnostic log file.
    pub log_path: PathBuf,
    pub model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub api_base_url: String,
    /// Splitter chunk size in characters.
    pub chunk_size: usize,
    /// Splitter overlap in characters.
    pub chunk_overlap: usize,
    /// Chunks retrieved per query.
    pub top_k: usize,
    /// Records shown in the rolling report.
    pub recent_interactions: usize,
    /// Records included in the `report` snapshot.
    pub snapshot_interactions: usize,
    /// Write the report through a temp file and rename.
    pub atomic_report_writes: bool,
    pub harmful_keywords: Vec<String>,
    pub injection_patterns: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from("d1.txt"),
            report_path: PathBuf::from("result.txt"),
            log_path: PathBuf::from("agent_evaluation.log"),
            model: "gemini-1.5-flash".to_string(),
            embedding_model: "models/embedding-001".to_string(),
            temperature: 0.0,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            chunk_size: 1000,
            chunk_overlap: 100,
            top_k: 4,
            recent_interactions: 5,
            snapshot_interactions: 10,
            atomic_report_writes: false,
            harmful_keywords: DEFAULT_HARMFUL_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            injection_patterns: DEFAULT_INJECTION_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SessionConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(EvalError::InvalidConfig(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(EvalError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(EvalError::InvalidConfig("top_k must be positive".to_string()));
        }
        if self.recent_interactions == 0 || self.snapshot_interactions == 0 {
            return Err(EvalError::InvalidConfig(
                "interaction windows must be positive".to_string(),
            ));
        }
        for (name, list) in [
            ("harmful_keywords", &self.harmful_keywords),
            ("injection_patterns", &self.injection_patterns),
        ] {
            if list.iter().any(|entry| entry.trim().is_empty()) {
                return Err(EvalError::InvalidConfig(format!(
                    "{} must not contain empty entries",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Stage 1 classifier built from the configured denylists.
    pub fn classifier(&self) -> DenylistClassifier {
        DenylistClassifier::new(
            self.harmful_keywords.clone(),
            self.injection_patterns.clone(),
        )
    }
}
