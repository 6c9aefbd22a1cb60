//! Gemini clients for embeddings and answer generation
//!
//! Both talk to the Generative Language API with an API key; the key rides
//! in the `x-goog-api-key` header, never in the URL.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::conversation::ConversationTurn;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::llm::LlmProvider;
use crate::retry::{self, RetryPolicy};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

fn build_client(config: &GeminiConfig) -> Result<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    let mut key = reqwest::header::HeaderValue::from_str(&config.api_key)
        .map_err(|_| Error::config("GEMINI_API_KEY contains invalid header characters"))?;
    key.set_sensitive(true);
    headers.insert("x-goog-api-key", key);

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))
}

fn retry_policy(config: &GeminiConfig) -> RetryPolicy {
    RetryPolicy::new(
        config.max_retries,
        Duration::from_millis(config.backoff_ms),
    )
}

/// Gemini embedding client (`models/{model}:embedContent`)
pub struct GeminiEmbedder {
    client: reqwest::Client,
    model: String,
    retry: RetryPolicy,
}

impl GeminiEmbedder {
    /// Create a new embedder from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            model: config.embed_model.clone(),
            retry: retry_policy(config),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:embedContent", API_BASE, self.model)
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            content: Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Gemini embedding failed ({}): {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse Gemini response: {}", e)))?;

        Ok(embed_response.embedding.values)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        retry::with_retry(&self.retry, "Gemini embedding", || self.embed_once(text)).await
    }

    fn name(&self) -> &str {
        "gemini-embedding"
    }
}

/// Gemini generation client (`models/{model}:generateContent`)
pub struct GeminiGenerator {
    client: reqwest::Client,
    model: String,
    retry: RetryPolicy,
}

impl GeminiGenerator {
    /// Create a new generator from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            model: config.generate_model.clone(),
            retry: retry_policy(config),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", API_BASE, self.model)
    }

    async fn generate_once(
        &self,
        turns: &[ConversationTurn],
        system_instruction: &str,
    ) -> Result<String> {
        let request = GenerateRequest {
            contents: turns.iter().map(Content::from_turn).collect(),
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse Gemini response: {}", e)))?;

        gen_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::llm("No text in Gemini response"))
    }
}

#[async_trait]
impl LlmProvider for GeminiGenerator {
    async fn generate(
        &self,
        turns: &[ConversationTurn],
        system_instruction: &str,
    ) -> Result<String> {
        retry::with_retry(&self.retry, "Gemini generation", || {
            self.generate_once(turns, system_instruction)
        })
        .await
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(serde::Serialize)]
struct EmbedRequest {
    content: Content,
}

#[derive(serde::Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(serde::Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(serde::Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
}

#[derive(serde::Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn from_turn(turn: &ConversationTurn) -> Self {
        Self {
            role: Some(turn.role.as_str().to_string()),
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        }
    }
}

#[derive(serde::Serialize)]
struct Part {
    text: String,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(serde::Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(serde::Deserialize)]
struct ResponsePart {
    text: String,
}
