//! Offline embedder for tests and dry runs.

use async_trait::async_trait;

use crate::embedder::Embedder;
use crate::error::Result;

/// Bag-of-words embedder: each lowercase token hashes into one bucket.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        for token in text.split_whitespace() {
            let mut h = 0u64;
            for b in token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
                .bytes()
            {
                h = h.wrapping_mul(131).wrapping_add(b as u64);
            }
            let idx = (h as usize) % self.dim;
            v[idx] += 1.0;
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }
}
