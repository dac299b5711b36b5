//! Retrieval-augmented answering chain.
//!
//! Retrieves the top-k chunks for a query, stuffs them into a single
//! grounded prompt, and asks the model for an answer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use ragwatch_core::{Answerer, EvalError, LlmClient};

use crate::embedder::Embedder;
use crate::store::{ScoredChunk, VectorStore};

/// Separator placed between stuffed chunks.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

pub fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the following question based only on the provided context:\n\n\
         <context>\n{}\n</context>\n\n\
         Question: {}",
        context, question
    )
}

pub fn stuff_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|hit| hit.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

pub struct RetrievalQa {
    store: VectorStore,
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn LlmClient>,
    top_k: usize,
}

impl RetrievalQa {
    pub fn new(
        store: VectorStore,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LlmClient>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            llm,
            top_k,
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Chunks that would be stuffed into the prompt for `query`.
    pub async fn retrieve(&self, query: &str) -> crate::Result<Vec<ScoredChunk>> {
        self.store
            .similarity_search(query, self.top_k, self.embedder.as_ref())
            .await
    }
}

#[async_trait]
impl Answerer for RetrievalQa {
    async fn answer(&self, query: &str) -> ragwatch_core::Result<String> {
        let hits = self.retrieve(query).await?;
        debug!(
            retrieved = hits.len(),
            digests = ?hits.iter().map(|h| h.chunk.digest.as_str()).collect::<Vec<_>>(),
            "context retrieved"
        );

        let prompt = answer_prompt(&stuff_context(&hits), query);
        let reply = self
            .llm
            .invoke(&prompt)
            .await
            .map_err(|e| EvalError::Answering(format!("generation failed: {}", e)))?;
        Ok(reply.content)
    }
}
