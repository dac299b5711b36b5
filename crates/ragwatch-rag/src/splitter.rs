//! Separator-based text splitting with overlap.
//!
//! The text is split on a fixed separator, empty pieces are dropped, and the
//! pieces are greedily merged back into chunks of at most `chunk_size`
//! characters. When a chunk is emitted, trailing pieces totalling at most
//! `chunk_overlap` characters are carried into the next chunk. A single piece
//! longer than `chunk_size` becomes its own oversized chunk.

use std::collections::VecDeque;

use tracing::warn;

use crate::error::{RagError, Result};

pub const DEFAULT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separator: String,
}

impl CharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::with_separator(chunk_size, chunk_overlap, DEFAULT_SEPARATOR)
    }

    pub fn with_separator(
        chunk_size: usize,
        chunk_overlap: usize,
        separator: impl Into<String>,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::InvalidSplitter(
                "chunk_size must be positive".to_string(),
            ));
        }
        if chunk_overlap > chunk_size {
            return Err(RagError::InvalidSplitter(format!(
                "chunk_overlap ({}) is larger than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        let separator = separator.into();
        if separator.is_empty() {
            return Err(RagError::InvalidSplitter(
                "separator must not be empty".to_string(),
            ));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separator,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let pieces = text.split(self.separator.as_str()).filter(|s| !s.is_empty());
        self.merge(pieces)
    }

    fn merge<'a>(&self, pieces: impl Iterator<Item = &'a str>) -> Vec<String> {
        let sep_len = self.separator.chars().count();
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = piece.chars().count();
            let joined_len = |total: usize, current: &VecDeque<&str>| {
                total + len + if current.is_empty() { 0 } else { sep_len }
            };

            if joined_len(total, &current) > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        size = total,
                        limit = self.chunk_size,
                        "created a chunk longer than the configured size"
                    );
                }
                if !current.is_empty() {
                    if let Some(chunk) = self.join(&current) {
                        chunks.push(chunk);
                    }
                    while total > self.chunk_overlap
                        || (joined_len(total, &current) > self.chunk_size && total > 0)
                    {
                        let Some(front) = current.pop_front() else {
                            break;
                        };
                        total -= front.chars().count() + if current.is_empty() { 0 } else { sep_len };
                    }
                }
            }

            current.push_back(piece);
            total += len + if current.len() > 1 { sep_len } else { 0 };
        }

        if let Some(chunk) = self.join(&current) {
            chunks.push(chunk);
        }
        chunks
    }

    fn join(&self, pieces: &VecDeque<&str>) -> Option<String> {
        let joined = pieces
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(&self.separator);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
