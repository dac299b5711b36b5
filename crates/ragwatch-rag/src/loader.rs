//! Plain-text document loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RagError, Result};

/// A loaded source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    /// Path the content was read from.
    pub source: String,
}

/// Read a UTF-8 text file.
///
/// Fails with [`RagError::EmptyDocument`] when the file holds only whitespace.
pub fn load_document(path: &Path) -> Result<Document> {
    let source = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| RagError::DocumentLoad {
        path: source.clone(),
        source: e,
    })?;

    if content.trim().is_empty() {
        return Err(RagError::EmptyDocument(source));
    }

    info!(path = %source, chars = content.chars().count(), "document loaded");
    Ok(Document { content, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Refund policy.\n\nShipping policy.").unwrap();

        let doc = load_document(file.path()).unwrap();
        assert!(doc.content.starts_with("Refund policy."));
        assert_eq!(doc.source, file.path().display().to_string());
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, RagError::DocumentLoad { .. }));
    }

    #[test]
    fn blank_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  \n\n ").unwrap();
        let err = load_document(file.path()).unwrap_err();
        assert!(matches!(err, RagError::EmptyDocument(_)));
    }
}
