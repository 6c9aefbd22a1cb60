//! The RAG query engine
//!
//! One `answer` call is a strict sequential chain: rewrite → embed →
//! retrieve → assemble context → generate. The history is mutated only
//! after the whole chain succeeds, so a failed call leaves it exactly as
//! it was.

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::conversation::{ConversationHistory, ConversationTurn};
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};
use crate::rag::prompt::{PromptBuilder, REFUSAL_ANSWER};
use crate::rag::rewriter::QueryRewriter;

/// Retrieval-augmented answer engine
pub struct RagEngine {
    rewriter: QueryRewriter,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl RagEngine {
    /// Create a new engine
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
        retrieval: &RetrievalConfig,
    ) -> Self {
        Self {
            rewriter: QueryRewriter::new(llm.clone()),
            embedder,
            store,
            llm,
            top_k: retrieval.top_k,
        }
    }

    /// Answer `question` in the context of `history`.
    ///
    /// On success, appends exactly one user turn (the rewritten question)
    /// and one model turn (the answer), in that order. On failure the
    /// history is left unmodified.
    pub async fn answer(
        &self,
        history: &mut ConversationHistory,
        question: &str,
    ) -> Result<String> {
        let standalone = self.rewriter.rewrite(history.turns(), question).await?;
        tracing::debug!("Standalone question: \"{}\"", standalone);

        let query_vector = self.embedder.embed(&standalone).await?;
        let results = self.store.query(&query_vector, self.top_k, true).await?;
        tracing::debug!("Retrieved {} chunks", results.len());

        let answer = if results.is_empty() {
            // Nothing retrieved: refuse deterministically, no model call.
            REFUSAL_ANSWER.to_string()
        } else {
            let context = PromptBuilder::build_context(&results);
            let mut turns = history.turns().to_vec();
            turns.push(ConversationTurn::user(standalone.clone()));

            self.llm
                .generate(&turns, &PromptBuilder::answer_instruction(&context))
                .await?
        };

        history.push_user(standalone);
        history.push_model(answer.clone());

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::error::Error;
    use crate::providers::RetrievedChunk;
    use crate::rag::prompt::REWRITE_INSTRUCTION;
    use crate::types::IndexRecord;
    use async_trait::async_trait;

    struct FakeEmbedder {
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            if self.fail {
                return Err(Error::embedding("down"));
            }
            Ok(vec![0.1, 0.2, 0.3])
        }

        fn name(&self) -> &str {
            "fake-embedder"
        }
    }

    struct FakeStore {
        results: Vec<RetrievedChunk>,
        fail: bool,
    }

    #[async_trait]
    impl VectorStoreProvider for FakeStore {
        fn dimension(&self) -> usize {
            3
        }

        async fn upsert(&self, _records: &[IndexRecord]) -> Result<()> {
            Ok(())
        }

        async fn query(
            &self,
            _vector: &[f32],
            top_k: usize,
            _include_metadata: bool,
        ) -> Result<Vec<RetrievedChunk>> {
            if self.fail {
                return Err(Error::vector_db("down"));
            }
            Ok(self.results.iter().take(top_k).cloned().collect())
        }

        fn name(&self) -> &str {
            "fake-store"
        }
    }

    /// Rewrites by prefixing, answers from whatever context it is given
    struct ScriptedLlm {
        fail_generation: bool,
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn generate(
            &self,
            turns: &[ConversationTurn],
            system_instruction: &str,
        ) -> Result<String> {
            if system_instruction == REWRITE_INSTRUCTION {
                return Ok(format!("standalone: {}", turns.last().unwrap().text));
            }
            if self.fail_generation {
                return Err(Error::llm("generation down"));
            }
            if system_instruction.contains("Android") {
                Ok("The SDK supports Android and iOS.".to_string())
            } else {
                Ok(REFUSAL_ANSWER.to_string())
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    fn engine_with(store: FakeStore, llm: ScriptedLlm, embed_fail: bool) -> RagEngine {
        RagEngine::new(
            Arc::new(FakeEmbedder { fail: embed_fail }),
            Arc::new(store),
            Arc::new(llm),
            &RetrievalConfig::default(),
        )
    }

    fn sdk_results() -> Vec<RetrievedChunk> {
        vec![
            RetrievedChunk {
                text: "The SDK ships for Android.".to_string(),
                score: 0.92,
            },
            RetrievedChunk {
                text: "iOS is supported from version 12.".to_string(),
                score: 0.88,
            },
        ]
    }

    #[tokio::test]
    async fn test_successful_answer_appends_one_turn_pair() {
        let engine = engine_with(
            FakeStore {
                results: sdk_results(),
                fail: false,
            },
            ScriptedLlm {
                fail_generation: false,
            },
            false,
        );
        let mut history = ConversationHistory::new();

        let answer = engine
            .answer(&mut history, "What platforms does the SDK support?")
            .await
            .unwrap();

        assert!(answer.contains("Android"));
        assert!(answer.contains("iOS"));
        assert_ne!(answer, REFUSAL_ANSWER);

        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(
            history.turns()[0].text,
            "standalone: What platforms does the SDK support?"
        );
        assert_eq!(history.turns()[1].role, Role::Model);
        assert_eq!(history.turns()[1].text, answer);
    }

    #[tokio::test]
    async fn test_history_alternates_over_many_answers() {
        let engine = engine_with(
            FakeStore {
                results: sdk_results(),
                fail: false,
            },
            ScriptedLlm {
                fail_generation: false,
            },
            false,
        );
        let mut history = ConversationHistory::new();

        for i in 0..3 {
            engine
                .answer(&mut history, &format!("question {}", i))
                .await
                .unwrap();
        }

        assert_eq!(history.len(), 6);
        for (i, turn) in history.turns().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Model };
            assert_eq!(turn.role, expected, "turn {} out of order", i);
        }
    }

    #[tokio::test]
    async fn test_empty_retrieval_refuses_verbatim() {
        let engine = engine_with(
            FakeStore {
                results: Vec::new(),
                fail: false,
            },
            ScriptedLlm {
                fail_generation: false,
            },
            false,
        );
        let mut history = ConversationHistory::new();

        let answer = engine.answer(&mut history, "Unrelated question").await.unwrap();

        assert_eq!(answer, REFUSAL_ANSWER);
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[1].text, REFUSAL_ANSWER);
    }

    #[tokio::test]
    async fn test_retrieval_failure_leaves_history_unmodified() {
        let engine = engine_with(
            FakeStore {
                results: Vec::new(),
                fail: true,
            },
            ScriptedLlm {
                fail_generation: false,
            },
            false,
        );
        let mut history = ConversationHistory::new();
        history.push_user("earlier question");
        history.push_model("earlier answer");

        let err = engine.answer(&mut history, "next question").await.unwrap_err();

        assert!(matches!(err, Error::VectorDb(_)));
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].text, "earlier question");
    }

    #[tokio::test]
    async fn test_embedding_failure_leaves_history_unmodified() {
        let engine = engine_with(
            FakeStore {
                results: sdk_results(),
                fail: false,
            },
            ScriptedLlm {
                fail_generation: false,
            },
            true,
        );
        let mut history = ConversationHistory::new();

        assert!(engine.answer(&mut history, "question").await.is_err());
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_history_unmodified() {
        let engine = engine_with(
            FakeStore {
                results: sdk_results(),
                fail: false,
            },
            ScriptedLlm {
                fail_generation: true,
            },
            false,
        );
        let mut history = ConversationHistory::new();

        let err = engine.answer(&mut history, "question").await.unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_sessions_never_interleave() {
        let engine = Arc::new(engine_with(
            FakeStore {
                results: sdk_results(),
                fail: false,
            },
            ScriptedLlm {
                fail_generation: false,
            },
            false,
        ));

        let store = crate::conversation::SessionStore::new();
        let (_, session_a) = store.create();
        let (_, session_b) = store.create();

        let engine_a = engine.clone();
        let engine_b = engine.clone();
        let a = {
            let session = session_a.clone();
            tokio::spawn(async move {
                let mut history = session.lock().await;
                engine_a.answer(&mut history, "question A").await.unwrap();
            })
        };
        let b = {
            let session = session_b.clone();
            tokio::spawn(async move {
                let mut history = session.lock().await;
                engine_b.answer(&mut history, "question B").await.unwrap();
            })
        };
        a.await.unwrap();
        b.await.unwrap();

        let history_a = session_a.lock().await;
        let history_b = session_b.lock().await;
        assert_eq!(history_a.len(), 2);
        assert_eq!(history_b.len(), 2);
        assert!(history_a.turns()[0].text.contains("question A"));
        assert!(history_b.turns()[0].text.contains("question B"));
    }
}
