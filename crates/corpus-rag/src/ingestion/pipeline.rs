//! Ingestion pipeline orchestration
//!
//! Loads the corpus, chunks it, verifies that the embedding model and the
//! vector index agree on a dimension, then embeds and upserts every chunk
//! under a fixed concurrency cap. Chunk-level failures are collected into
//! the report instead of aborting the batch; the dimension guard runs
//! before any write.

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{ChunkingConfig, IngestionConfig};
use crate::error::{Error, Result};
use crate::ingestion::{PdfLoader, TextChunker};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{Chunk, ChunkFailure, Document, IndexRecord, IngestionReport};

/// Fixed probe string embedded once to learn the model's live dimension
pub const DIMENSION_PROBE: &str = "test";

/// PDF → vector index ingestion pipeline
pub struct IngestionPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    chunker: TextChunker,
    max_concurrency: usize,
}

impl IngestionPipeline {
    /// Create a new pipeline
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        chunking: &ChunkingConfig,
        ingestion: &IngestionConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            chunker: TextChunker::from_config(chunking),
            max_concurrency: ingestion.max_concurrency.max(1),
        }
    }

    /// Ingest the manual list plus the folder into the vector index.
    pub async fn ingest(
        &self,
        manual: &[PathBuf],
        folder: Option<&Path>,
    ) -> Result<IngestionReport> {
        let documents = PdfLoader::load_corpus(manual, folder)?;
        self.index_documents(documents).await
    }

    /// Chunk, embed, and upsert already-loaded documents.
    pub async fn index_documents(&self, documents: Vec<Document>) -> Result<IngestionReport> {
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.chunker.chunk_document(doc))
            .collect();
        tracing::info!(
            "Chunking done: {} chunks from {} documents",
            chunks.len(),
            documents.len()
        );

        self.check_dimensions().await?;

        let results: Vec<std::result::Result<(), ChunkFailure>> = stream::iter(chunks.iter())
            .map(|chunk| async move {
                self.index_chunk(chunk).await.map_err(|e| ChunkFailure {
                    source: chunk.source.clone(),
                    sequence: chunk.sequence,
                    reason: e.to_string(),
                })
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let failures: Vec<ChunkFailure> = results.into_iter().filter_map(|r| r.err()).collect();
        let report = IngestionReport {
            documents: documents.len(),
            chunks_total: chunks.len(),
            chunks_indexed: chunks.len() - failures.len(),
            failures,
            completed_at: chrono::Utc::now(),
        };

        if report.is_complete() {
            tracing::info!("Indexed {} chunks", report.chunks_indexed);
        } else {
            tracing::warn!(
                "Indexed {} of {} chunks ({} failures)",
                report.chunks_indexed,
                report.chunks_total,
                report.failures.len()
            );
        }

        Ok(report)
    }

    /// Abort before any write when the embedding model and the index
    /// disagree on dimensions. Checked once per run, not per chunk.
    async fn check_dimensions(&self) -> Result<()> {
        let probe = self.embedder.embed(DIMENSION_PROBE).await?;
        let expected = self.store.dimension();

        if probe.len() != expected {
            return Err(Error::config(format!(
                "Embedding dimension {} does not match index dimension {}. \
                 Recreate the index with dimension {} or switch to an embedding \
                 model that outputs {} dimensions.",
                probe.len(),
                expected,
                probe.len(),
                expected
            )));
        }

        tracing::info!("Embedding dimension {} matches the index", expected);
        Ok(())
    }

    async fn index_chunk(&self, chunk: &Chunk) -> Result<()> {
        let values = self.embedder.embed(&chunk.text).await?;
        let record = IndexRecord::from_chunk(chunk, values);
        self.store.upsert(std::slice::from_ref(&record)).await
    }
}
