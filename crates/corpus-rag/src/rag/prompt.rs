//! System instructions and context assembly for the query pipeline

use crate::providers::RetrievedChunk;

/// Separator between retrieved chunks in the answer context.
///
/// Assumed not to occur in source text; a chunk containing it would make
/// context boundaries ambiguous.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// The exact sentence returned when the answer is not in the context
pub const REFUSAL_ANSWER: &str = "I could not find the answer in the provided document.";

/// System instruction for the query rewriter
pub const REWRITE_INSTRUCTION: &str = "You are a query rewriting expert. Based on the provided chat history, rephrase the \"Follow Up user Question\" into a complete, standalone question that can be understood without the chat history.\nOnly output the rewritten question and nothing else.";

/// Prompt builder for the query pipeline
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved texts in descending-similarity order
    pub fn build_context(results: &[RetrievedChunk]) -> String {
        results
            .iter()
            .map(|result| result.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    /// System instruction grounding the answer strictly in `context`
    pub fn answer_instruction(context: &str) -> String {
        format!(
            "You have to behave like a documentation QA expert.\n\
             You will be given a context of relevant information and a user question.\n\
             Your task is to answer the user's question based ONLY on the provided context.\n\
             If the answer is not in the context, you must say \"{}\"\n\
             Keep your answers clear, concise, and educational.\n\
             \n\
             Context: {}",
            REFUSAL_ANSWER, context
        )
    }
}
