//! Vector store provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::IndexRecord;

/// A record returned by a similarity query
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Stored chunk text
    pub text: String,
    /// Similarity score, higher is more similar
    pub score: f32,
}

/// Trait for vector persistence and nearest-neighbor search
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// The index's configured vector dimension
    fn dimension(&self) -> usize;

    /// Insert records; additive and idempotent per record ID
    async fn upsert(&self, records: &[IndexRecord]) -> Result<()>;

    /// Top-K nearest records, ordered by descending similarity
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievedChunk>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
