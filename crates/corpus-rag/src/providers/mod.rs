//! Provider abstractions for embeddings, generation, and vector storage
//!
//! Trait seams keep the pipeline and the query engine independent of the
//! concrete services (Gemini, Pinecone) behind them.

pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod pinecone;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use gemini::{GeminiEmbedder, GeminiGenerator};
pub use llm::LlmProvider;
pub use pinecone::PineconeIndex;
pub use vector_store::{RetrievedChunk, VectorStoreProvider};
