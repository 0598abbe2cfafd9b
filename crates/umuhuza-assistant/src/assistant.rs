//! The end-to-end generation pipeline: retrieve, assemble, complete.

use tracing::{debug, warn};
use umuhuza_config::UmuhuzaConfig;
use umuhuza_embeddings::HashEmbedder;
use umuhuza_knowledge::{KnowledgeStore, retrieve};
use umuhuza_llm::{CompletionRequest, SharedBackend};

use crate::context::{ConversationTurn, build_messages};
use crate::error::{AssistantError, Result};

/// Reply substituted when the provider returns an empty completion.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response this time.";

/// The UMUHUZA platform assistant.
///
/// Owns an injected chat backend and the query-side embedder. The knowledge
/// store is passed per call: web workers hold one store handle and share the
/// assistant across requests, while callers without a store (or with a store
/// that is still being seeded) simply pass `None` and get ungrounded answers.
pub struct Assistant {
    backend: SharedBackend,
    embedder: HashEmbedder,
    config: UmuhuzaConfig,
}

impl Assistant {
    /// Create an assistant with an explicit backend and configuration.
    pub fn new(backend: SharedBackend, config: UmuhuzaConfig) -> Self {
        let embedder = HashEmbedder::new(config.embedding.dim);
        Self {
            backend,
            embedder,
            config,
        }
    }

    /// The embedder this assistant encodes queries with.
    pub fn embedder(&self) -> &HashEmbedder {
        &self.embedder
    }

    /// Generate a reply to `user_message` given prior `history` and an
    /// optional knowledge store.
    ///
    /// Retrieval is best-effort: a failing store logs a warning and the
    /// request proceeds without context. Backend errors propagate unmodified.
    /// An empty completion is replaced with [`FALLBACK_REPLY`] rather than
    /// returned as an empty string.
    pub async fn generate(
        &self,
        user_message: &str,
        history: &[ConversationTurn],
        store: Option<&KnowledgeStore>,
    ) -> Result<String> {
        let user_message = user_message.trim();
        if user_message.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        let snippets = match store {
            Some(store) => match retrieve(
                store,
                &self.embedder,
                user_message,
                self.config.retrieval.top_k,
            ) {
                Ok(snippets) => snippets,
                Err(e) => {
                    warn!("Knowledge retrieval failed, continuing without context: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        debug!(
            snippets = snippets.len(),
            history = history.len(),
            "Assembling conversation"
        );

        let messages = build_messages(
            history,
            user_message,
            &snippets,
            self.config.retrieval.history_window,
        );

        let request = CompletionRequest::new(self.config.llm.model.clone(), messages)
            .with_temperature(self.config.llm.temperature)
            .with_max_tokens(self.config.llm.max_tokens);

        let reply = self.backend.complete(request).await?;

        if reply.trim().is_empty() {
            Ok(FALLBACK_REPLY.to_string())
        } else {
            Ok(reply.trim().to_string())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use umuhuza_llm::{ChatError, MockBackend, Role};

    fn assistant_with(backend: Arc<MockBackend>, dim: usize) -> Assistant {
        let mut config = UmuhuzaConfig::default();
        config.embedding.dim = dim;
        Assistant::new(backend, config)
    }

    fn seeded_store(embedder: &HashEmbedder, snippets: &[&str]) -> KnowledgeStore {
        let store = KnowledgeStore::open_in_memory().unwrap();
        for snippet in snippets {
            store.insert(snippet, &embedder.embed(snippet)).unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let backend = Arc::new(MockBackend::new());
        let assistant = assistant_with(backend, 64);

        let err = assistant.generate("   ", &[], None).await.unwrap_err();
        assert!(matches!(err, AssistantError::EmptyMessage));
    }

    #[tokio::test]
    async fn test_reply_passthrough() {
        let backend = Arc::new(MockBackend::new());
        backend.push_reply("Market prices update daily.");
        let assistant = assistant_with(backend, 64);

        let reply = assistant
            .generate("how fresh are prices?", &[], None)
            .await
            .unwrap();
        assert_eq!(reply, "Market prices update daily.");
    }

    #[tokio::test]
    async fn test_empty_reply_becomes_fallback() {
        let backend = Arc::new(MockBackend::new());
        backend.push_reply("   ");
        let assistant = assistant_with(backend, 64);

        let reply = assistant.generate("question", &[], None).await.unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_backend_errors_pass_through() {
        let backend = Arc::new(MockBackend::new());
        backend.push_error(ChatError::MissingApiKey);
        backend.push_error(ChatError::RateLimited("slow down".to_string()));
        backend.push_error(ChatError::Unavailable("500".to_string()));
        let assistant = assistant_with(backend, 64);

        let err = assistant.generate("q", &[], None).await.unwrap_err();
        assert!(matches!(err, AssistantError::Chat(ChatError::MissingApiKey)));

        let err = assistant.generate("q", &[], None).await.unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Chat(ChatError::RateLimited(_))
        ));

        let err = assistant.generate("q", &[], None).await.unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Chat(ChatError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_retrieved_knowledge_reaches_the_backend() {
        let backend = Arc::new(MockBackend::new());
        backend.push_reply("grounded answer");
        let assistant = assistant_with(Arc::clone(&backend), 256);

        let store = seeded_store(
            assistant.embedder(),
            &["Irrigation kits are listed under the technology tab."],
        );

        assistant
            .generate("where do I find irrigation kits?", &[], Some(&store))
            .await
            .unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let knowledge_message = requests[0]
            .messages
            .iter()
            .find(|m| m.role == Role::System && m.content.contains("knowledge base excerpts"))
            .expect("knowledge system message present");
        assert!(knowledge_message.content.contains("technology tab"));
    }

    #[tokio::test]
    async fn test_no_store_means_no_knowledge_message() {
        let backend = Arc::new(MockBackend::new());
        backend.push_reply("ungrounded answer");
        let assistant = assistant_with(Arc::clone(&backend), 64);

        assistant.generate("anything", &[], None).await.unwrap();

        let requests = backend.requests();
        let system_messages: Vec<_> = requests[0]
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .collect();
        assert_eq!(system_messages.len(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_configured_model_and_sampling() {
        let backend = Arc::new(MockBackend::new());
        backend.push_reply("ok");

        let mut config = UmuhuzaConfig::default();
        config.llm.model = "test-model".to_string();
        config.llm.temperature = 0.9;
        config.llm.max_tokens = 123;
        let assistant = Assistant::new(Arc::clone(&backend) as SharedBackend, config);

        assistant.generate("q", &[], None).await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].temperature, 0.9);
        assert_eq!(requests[0].max_tokens, 123);
    }

    #[tokio::test]
    async fn test_history_included_in_request() {
        let backend = Arc::new(MockBackend::new());
        backend.push_reply("ok");
        let assistant = assistant_with(Arc::clone(&backend), 64);

        let history = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("hello"),
        ];
        assistant.generate("next", &history, None).await.unwrap();

        let requests = backend.requests();
        let contents: Vec<_> = requests[0]
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert!(contents.contains(&"hi"));
        assert!(contents.contains(&"hello"));
        assert_eq!(*contents.last().unwrap(), "next");
    }
}
