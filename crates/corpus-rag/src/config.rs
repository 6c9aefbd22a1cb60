//! Configuration for the RAG service
//!
//! Credentials are read from the environment at process start and validated
//! up front, so a missing key fails immediately instead of surfacing as a
//! mid-request failure.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Gemini (embeddings + generation) configuration
    pub gemini: GeminiConfig,
    /// Pinecone configuration
    pub pinecone: PineconeConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Ingestion configuration
    pub ingestion: IngestionConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Required: `GEMINI_API_KEY`, `PINECONE_API_KEY`, `PINECONE_INDEX_NAME`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    Error::config(format!(
                        "{} is not set; export it or add it to .env",
                        key
                    ))
                })
        };

        let mut config = Self {
            gemini: GeminiConfig {
                api_key: required("GEMINI_API_KEY")?,
                ..GeminiConfig::default()
            },
            pinecone: PineconeConfig {
                api_key: required("PINECONE_API_KEY")?,
                index_name: required("PINECONE_INDEX_NAME")?,
                ..PineconeConfig::default()
            },
            ..Self::default()
        };

        if let Some(model) = lookup("GEMINI_EMBED_MODEL") {
            config.gemini.embed_model = model;
        }
        if let Some(model) = lookup("GEMINI_GENERATE_MODEL") {
            config.gemini.generate_model = model;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| Error::config(format!("SERVER_PORT is not a port number: {}", port)))?;
        }

        Ok(config)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

/// Gemini configuration, shared by the embedding and generation clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key (never logged)
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Initial retry backoff in milliseconds (doubled per attempt)
    pub backoff_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            embed_model: "text-embedding-004".to_string(),
            generate_model: "gemini-2.0-flash".to_string(),
            timeout_secs: 60,
            max_retries: 2,
            backoff_ms: 500,
        }
    }
}

/// Pinecone configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PineconeConfig {
    /// API key (never logged)
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// Index name
    pub index_name: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Initial retry backoff in milliseconds (doubled per attempt)
    pub backoff_ms: u64,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            index_name: String::new(),
            timeout_secs: 30,
            max_retries: 2,
            backoff_ms: 500,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest records per similarity query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Maximum simultaneous embed+upsert operations
    pub max_concurrency: usize,
    /// Default folder scanned for PDFs
    pub pdf_folder: PathBuf,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            pdf_folder: PathBuf::from("pdf_docs"),
        }
    }
}
