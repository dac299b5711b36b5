//! Text embedding boundary.

use async_trait::async_trait;

use crate::error::Result;

/// Maps text to dense vectors.
///
/// `embed_documents` must return one vector per input, in order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}
