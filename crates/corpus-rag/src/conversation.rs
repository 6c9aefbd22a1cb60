//! Conversation state, scoped per session
//!
//! Histories are append-only and owned by a `SessionStore` keyed by session
//! ID; the server layer creates and evicts sessions, and every query locks
//! its own session for the duration of the answer. Nothing here survives a
//! process restart.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The generative model
    Model,
}

impl Role {
    /// Wire name expected by the Gemini API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One question or answer in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke
    pub role: Role,
    /// What was said
    pub text: String,
}

impl ConversationTurn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model turn
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Ordered sequence of turns for one session
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// All turns, oldest first
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Append a user turn
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::user(text));
    }

    /// Append a model turn
    pub fn push_model(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::model(text));
    }

    /// Number of turns recorded
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns have been recorded yet
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Shared handle to one session's history
pub type SessionHandle = Arc<Mutex<ConversationHistory>>;

/// Registry of live sessions.
///
/// Each session's history sits behind its own async lock; holding the lock
/// across a full answer call serializes turns within a session while leaving
/// other sessions untouched.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionHandle>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh session and return its ID and handle
    pub fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle: SessionHandle = Arc::new(Mutex::new(ConversationHistory::new()));
        self.sessions.insert(id, handle.clone());
        (id, handle)
    }

    /// Look up an existing session
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Resolve a request's session: reuse the given ID when known,
    /// otherwise start a new session.
    pub fn resolve(&self, id: Option<Uuid>) -> (Uuid, SessionHandle) {
        match id.and_then(|id| self.get(&id).map(|handle| (id, handle))) {
            Some(found) => found,
            None => self.create(),
        }
    }

    /// Drop a session and its history
    pub fn evict(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any sessions are live
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
