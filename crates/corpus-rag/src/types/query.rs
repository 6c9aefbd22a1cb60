//! Query request types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Request body for `POST /ask`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    #[serde(default)]
    pub question: Option<String>,

    /// Conversation to continue; a new session is created when absent
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

impl AskRequest {
    /// Create a request for a fresh session
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            session_id: None,
        }
    }

    /// Validate and extract the question text
    pub fn question(&self) -> Result<&str> {
        self.question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| Error::validation("Question is required"))
    }
}
