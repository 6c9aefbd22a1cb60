//! History-aware query rewriting
//!
//! Turns an elliptical follow-up ("what about its latency?") into a
//! standalone question so retrieval works without the conversation.
//! Pure over the history: the new question is appended to a private copy
//! of the turns, never to the shared history.

use std::sync::Arc;

use crate::conversation::ConversationTurn;
use crate::error::Result;
use crate::providers::LlmProvider;
use crate::rag::prompt::REWRITE_INSTRUCTION;

/// Rewrites follow-up questions into standalone ones
pub struct QueryRewriter {
    llm: Arc<dyn LlmProvider>,
}

impl QueryRewriter {
    /// Create a new rewriter
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Rewrite `question` against a snapshot of the conversation.
    ///
    /// With an empty history the model passes the question through.
    pub async fn rewrite(
        &self,
        history: &[ConversationTurn],
        question: &str,
    ) -> Result<String> {
        let mut turns = history.to_vec();
        turns.push(ConversationTurn::user(question));

        let rewritten = self.llm.generate(&turns, REWRITE_INSTRUCTION).await?;
        Ok(rewritten.trim().to_string())
    }
}
