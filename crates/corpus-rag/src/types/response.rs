//! Response and report types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response body for `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// The grounded answer
    pub answer: String,
    /// Session to pass back for follow-up questions
    pub session_id: Uuid,
}

/// Outcome of one ingestion run.
///
/// Chunk-level failures are accumulated rather than aborting the batch, so
/// an operator can tell "nothing indexed" from "N of M chunks indexed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Documents loaded from the manual list plus the folder
    pub documents: usize,
    /// Chunks produced by the chunker
    pub chunks_total: usize,
    /// Chunks embedded and upserted successfully
    pub chunks_indexed: usize,
    /// Per-chunk failures, with reasons
    pub failures: Vec<ChunkFailure>,
    /// When the run finished
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl IngestionReport {
    /// Whether every chunk made it into the index
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.chunks_indexed == self.chunks_total
    }
}

/// A single chunk that failed to embed or upsert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkFailure {
    /// Source file the chunk came from
    pub source: String,
    /// Chunk position within its document
    pub sequence: u32,
    /// Failure reason
    pub reason: String,
}
