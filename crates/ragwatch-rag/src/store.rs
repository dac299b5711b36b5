//! In-memory vector store with cosine similarity search.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::embedder::Embedder;
use crate::error::{RagError, Result};

/// An indexed slice of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the source document.
    pub index: usize,
    pub text: String,
    /// Hex SHA-256 of `text`.
    pub digest: String,
}

impl Chunk {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let digest = hex::encode(Sha256::digest(text.as_bytes()));
        Self {
            index,
            text,
            digest,
        }
    }
}

/// A chunk returned by a search, with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    entries: Vec<(Chunk, Vec<f32>)>,
}

impl VectorStore {
    /// Embed every chunk text and build the index.
    pub async fn from_texts(texts: Vec<String>, embedder: &dyn Embedder) -> Result<Self> {
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_documents(&texts).await?
        };
        if vectors.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        let entries: Vec<(Chunk, Vec<f32>)> = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(i, text))
            .zip(vectors)
            .collect();

        for (chunk, _) in &entries {
            debug!(index = chunk.index, digest = %chunk.digest, "chunk indexed");
        }
        info!(chunks = entries.len(), "vector store built");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|(chunk, _)| chunk)
    }

    /// Top `k` chunks by cosine similarity, best first.
    ///
    /// Ties keep document order.
    pub fn search_by_vector(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, vector)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query, vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.index.cmp(&b.chunk.index))
        });
        scored.truncate(k);
        scored
    }

    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        embedder: &dyn Embedder,
    ) -> Result<Vec<ScoredChunk>> {
        let vector = embedder.embed_query(query).await?;
        Ok(self.search_by_vector(&vector, k))
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}
