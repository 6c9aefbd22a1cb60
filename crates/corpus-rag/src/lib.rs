//! corpus-rag: Conversational question answering over a PDF corpus
//!
//! An offline ingestion pipeline turns PDFs into Pinecone vector records;
//! an online query service rewrites follow-up questions into standalone
//! ones, retrieves the nearest chunks, and asks Gemini for an answer
//! grounded strictly in what was retrieved.

pub mod config;
pub mod conversation;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod rag;
pub mod retry;
pub mod server;
pub mod types;

pub use config::Config;
pub use conversation::{ConversationHistory, ConversationTurn, Role, SessionStore};
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, Document, IndexRecord},
    query::AskRequest,
    response::{AskResponse, IngestionReport},
};
