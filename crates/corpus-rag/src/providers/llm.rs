//! Generative model provider trait

use async_trait::async_trait;

use crate::conversation::ConversationTurn;
use crate::error::Result;

/// Trait for LLM text generation.
///
/// Stateless per call: the full conversation and the system instruction are
/// passed explicitly every time.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a reply to the given conversation
    async fn generate(
        &self,
        turns: &[ConversationTurn],
        system_instruction: &str,
    ) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
