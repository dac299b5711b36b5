//! Error types for ragwatch-rag

use thiserror::Error;

use ragwatch_core::EvalError;

/// Errors raised while building or querying the retrieval index
#[derive(Error, Debug)]
pub enum RagError {
    /// Source document could not be read
    #[error("Failed to load document {path}: {source}")]
    DocumentLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Source document has no text to index
    #[error("Document is empty: {0}")]
    EmptyDocument(String),

    /// Splitter parameters are inconsistent
    #[error("Invalid splitter configuration: {0}")]
    InvalidSplitter(String),

    /// Embedding count or dimension mismatch
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Remote API rejected the request
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Remote API answered with an unexpected body
    #[error("Unexpected API response: {0}")]
    ResponseParse(String),

    /// Missing API key
    #[error("API key not set (expected env var {0})")]
    MissingApiKey(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the API key.
        RagError::Http(err.without_url().to_string())
    }
}

/// Retrieval failures surface to the pipeline as answering failures.
impl From<RagError> for EvalError {
    fn from(err: RagError) -> Self {
        EvalError::Answering(err.to_string())
    }
}

/// Result type for ragwatch-rag operations
pub type Result<T> = std::result::Result<T, RagError>;
