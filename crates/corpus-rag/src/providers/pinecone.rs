//! Pinecone vector index provider
//!
//! `connect` resolves the index's data-plane host and configured dimension
//! from the control plane once; upserts and queries then go straight to the
//! index host.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::PineconeConfig;
use crate::error::{Error, Result};
use crate::providers::vector_store::{RetrievedChunk, VectorStoreProvider};
use crate::retry::{self, RetryPolicy};
use crate::types::IndexRecord;

const CONTROL_PLANE: &str = "https://api.pinecone.io";

/// Pinecone index client
pub struct PineconeIndex {
    client: reqwest::Client,
    index_name: String,
    /// Data-plane host, e.g. "docs-abc123.svc.aped-4627.pinecone.io"
    host: String,
    /// Dimension the index was created with
    dimension: usize,
    retry: RetryPolicy,
}

impl PineconeIndex {
    /// Connect to the configured index, resolving its host and dimension.
    pub async fn connect(config: &PineconeConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut key = reqwest::header::HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::config("PINECONE_API_KEY contains invalid header characters"))?;
        key.set_sensitive(true);
        headers.insert("Api-Key", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        let url = format!("{}/indexes/{}", CONTROL_PLANE, config.index_name);
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("Pinecone describe request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_db(format!(
                "Failed to describe index '{}' ({}): {}",
                config.index_name, status, body
            )));
        }

        let description: IndexDescription = response
            .json()
            .await
            .map_err(|e| Error::vector_db(format!("Failed to parse index description: {}", e)))?;

        tracing::info!(
            "Connected to Pinecone index '{}' (dimension {}, host {})",
            config.index_name,
            description.dimension,
            description.host
        );

        Ok(Self {
            client,
            index_name: config.index_name.clone(),
            host: description.host,
            dimension: description.dimension,
            retry: RetryPolicy::new(
                config.max_retries,
                Duration::from_millis(config.backoff_ms),
            ),
        })
    }

    /// The index this client talks to
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn upsert_endpoint(&self) -> String {
        format!("https://{}/vectors/upsert", self.host)
    }

    fn query_endpoint(&self) -> String {
        format!("https://{}/query", self.host)
    }

    async fn upsert_once(&self, records: &[IndexRecord]) -> Result<()> {
        let request = UpsertRequest {
            vectors: records.iter().map(Vector::from_record).collect(),
        };

        let response = self
            .client
            .post(self.upsert_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("Pinecone upsert request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_db(format!(
                "Pinecone upsert failed ({}): {}",
                status, body
            )));
        }

        Ok(())
    }

    async fn query_once(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievedChunk>> {
        let request = QueryRequest {
            vector: vector.to_vec(),
            top_k,
            include_metadata,
        };

        let response = self
            .client
            .post(self.query_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("Pinecone query request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_db(format!(
                "Pinecone query failed ({}): {}",
                status, body
            )));
        }

        let query_response: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::vector_db(format!("Failed to parse query response: {}", e)))?;

        Ok(query_response
            .matches
            .into_iter()
            .map(|m| {
                let text = m
                    .metadata
                    .as_ref()
                    .and_then(|meta| meta.get("text"))
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string();
                if text.is_empty() {
                    tracing::warn!("Match {} has no stored text", m.id);
                }
                RetrievedChunk {
                    text,
                    score: m.score,
                }
            })
            .collect())
    }
}

#[async_trait]
impl VectorStoreProvider for PineconeIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, records: &[IndexRecord]) -> Result<()> {
        retry::with_retry(&self.retry, "Pinecone upsert", || self.upsert_once(records)).await
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievedChunk>> {
        retry::with_retry(&self.retry, "Pinecone query", || {
            self.query_once(vector, top_k, include_metadata)
        })
        .await
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}

#[derive(serde::Deserialize)]
struct IndexDescription {
    dimension: usize,
    host: String,
}

#[derive(serde::Serialize)]
struct UpsertRequest {
    vectors: Vec<Vector>,
}

#[derive(serde::Serialize)]
struct Vector {
    id: String,
    values: Vec<f32>,
    metadata: serde_json::Value,
}

impl Vector {
    fn from_record(record: &IndexRecord) -> Self {
        Self {
            id: record.id.clone(),
            values: record.values.clone(),
            metadata: serde_json::json!(record.metadata),
        }
    }
}

#[derive(serde::Serialize)]
struct QueryRequest {
    vector: Vec<f32>,
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(serde::Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(serde::Deserialize)]
struct Match {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, Document};

    #[test]
    fn test_index_description_parsing() {
        let body = r#"{
            "name": "docs",
            "dimension": 768,
            "metric": "cosine",
            "host": "docs-abc123.svc.aped-4627.pinecone.io",
            "status": {"ready": true, "state": "Ready"}
        }"#;
        let parsed: IndexDescription = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.dimension, 768);
        assert_eq!(parsed.host, "docs-abc123.svc.aped-4627.pinecone.io");
    }

    #[test]
    fn test_query_request_wire_format() {
        let request = QueryRequest {
            vector: vec![0.5; 3],
            top_k: 10,
            include_metadata: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topK"], 10);
        assert_eq!(json["includeMetadata"], true);
    }

    #[test]
    fn test_query_response_extracts_stored_text() {
        let body = r#"{
            "matches": [
                {"id": "a", "score": 0.91, "metadata": {"text": "Android and iOS", "source": "faq.pdf"}},
                {"id": "b", "score": 0.45}
            ]
        }"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(
            parsed.matches[0]
                .metadata
                .as_ref()
                .and_then(|m| m.get("text"))
                .and_then(|t| t.as_str()),
            Some("Android and iOS")
        );
        assert!(parsed.matches[1].metadata.is_none());
    }

    #[test]
    fn test_vector_from_record_keeps_metadata() {
        let doc = Document::new("faq.pdf", "body", None);
        let chunk = Chunk::new("body", &doc, 0);
        let record = IndexRecord::from_chunk(&chunk, vec![0.1, 0.2, 0.3]);
        let vector = Vector::from_record(&record);

        assert_eq!(vector.values.len(), 3);
        assert_eq!(vector.metadata["text"], "body");
        assert_eq!(vector.metadata["source"], "faq.pdf");
    }
}
