//! Document, chunk, and index record types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A raw document produced by the loader.
///
/// Immutable once created; dropped after chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Source file name (used as metadata on every chunk)
    pub source: String,
    /// Extracted text
    pub text: String,
    /// Total number of pages, when the parser reports it
    pub pages: Option<u32>,
}

impl Document {
    /// Create a new document
    pub fn new(source: impl Into<String>, text: impl Into<String>, pages: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            text: text.into(),
            pages,
        }
    }
}

/// A bounded window of a source document, the unit of retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content
    pub text: String,
    /// Source file name inherited from the document
    pub source: String,
    /// Page count inherited from the document
    pub page_count: Option<u32>,
    /// Position of this chunk within its document, in source order
    pub sequence: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: impl Into<String>, doc: &Document, sequence: u32) -> Self {
        Self {
            text: text.into(),
            source: doc.source.clone(),
            page_count: doc.pages,
            sequence,
        }
    }
}

/// A record written to the vector index during ingestion.
///
/// Records are additive; re-ingesting creates new records rather than
/// updating old ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Record ID
    pub id: String,
    /// Embedding vector
    pub values: Vec<f32>,
    /// Chunk text (also carried in metadata for retrieval)
    pub text: String,
    /// Source metadata
    pub metadata: HashMap<String, serde_json::Value>,
}

impl IndexRecord {
    /// Build a record from a chunk and its embedding
    pub fn from_chunk(chunk: &Chunk, values: Vec<f32>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("text".to_string(), serde_json::json!(chunk.text));
        metadata.insert("source".to_string(), serde_json::json!(chunk.source));
        metadata.insert("sequence".to_string(), serde_json::json!(chunk.sequence));
        if let Some(pages) = chunk.page_count {
            metadata.insert("page_count".to_string(), serde_json::json!(pages));
        }

        Self {
            id: Uuid::new_v4().to_string(),
            values,
            text: chunk.text.clone(),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_inherits_source_metadata() {
        let doc = Document::new("sdk_faq.pdf", "some text", Some(3));
        let chunk = Chunk::new("some text", &doc, 0);

        assert_eq!(chunk.source, "sdk_faq.pdf");
        assert_eq!(chunk.page_count, Some(3));
        assert_eq!(chunk.sequence, 0);
    }

    #[test]
    fn test_index_record_carries_text_in_metadata() {
        let doc = Document::new("sdk_faq.pdf", "chunk body", None);
        let chunk = Chunk::new("chunk body", &doc, 4);
        let record = IndexRecord::from_chunk(&chunk, vec![0.1, 0.2]);

        assert_eq!(record.values.len(), 2);
        assert_eq!(record.metadata["text"], serde_json::json!("chunk body"));
        assert_eq!(record.metadata["source"], serde_json::json!("sdk_faq.pdf"));
        assert_eq!(record.metadata["sequence"], serde_json::json!(4));
        assert!(!record.metadata.contains_key("page_count"));
    }
}
