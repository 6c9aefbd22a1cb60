//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for mapping text to a fixed-dimension vector.
///
/// The output dimension is a property of the configured model; callers
/// learn it by embedding a probe string rather than trusting static
/// configuration (see the ingestion pipeline's dimension guard).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
