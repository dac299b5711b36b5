//! Error taxonomy for the evaluation core.

/// Evaluation core errors.
///
/// Judge failures and report write failures are recovered inside the
/// pipeline; they only surface when a caller invokes a collaborator or the
/// report writer directly.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("language model call failed: {0}")]
    Llm(String),

    #[error("answering failed: {0}")]
    Answering(String),

    #[error("report write failed for {path}: {source}")]
    ReportWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for evaluation core operations.
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_error_display() {
        let err = EvalError::EmptyQuery;
        assert!(err.to_string().contains("must not be empty"));

        let err = EvalError::Llm("quota exceeded".to_string());
        assert!(err.to_string().contains("language model call failed"));
        assert!(err.to_string().contains("quota exceeded"));

        let err = EvalError::Answering("retriever offline".to_string());
        assert!(err.to_string().contains("answering failed"));
    }

    #[test]
    fn test_report_write_error_names_path() {
        let err = EvalError::ReportWrite {
            path: "result.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("result.txt"));
        assert!(msg.contains("denied"));
    }
}
