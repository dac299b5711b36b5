//! RAGWATCH retrieval collaborators
//!
//! Everything the evaluation session treats as external: loading and
//! chunking the source document, embedding and indexing the chunks, the
//! retrieval-augmented answering chain, and the Gemini REST client.

pub mod chain;
pub mod embedder;
pub mod error;
pub mod fakes;
pub mod gemini;
pub mod loader;
pub mod splitter;
pub mod store;

pub use chain::RetrievalQa;
pub use embedder::Embedder;
pub use error::{RagError, Result};
pub use gemini::GeminiClient;
pub use loader::{load_document, Document};
pub use splitter::CharacterSplitter;
pub use store::{Chunk, ScoredChunk, VectorStore};
