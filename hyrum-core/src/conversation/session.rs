//! Knowledge-grounded chat session

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::knowledge::{Excerpt, KnowledgeMatcher, KnowledgeStore};
use crate::llm::{CompletionProvider, CompletionRequest, Message, MessageRole, SamplingParams};

use super::history::ConversationHistory;

/// Prefix of the text returned by [`ChatSession::send`] when the completion fails
pub const ERROR_PREFIX: &str = "Erro: ";

/// Label of the block appended to user messages that match store topics
pub const KNOWLEDGE_HEADER: &str = "**INFORMAÇÕES DA LOJA PARA CONSULTA:**";

/// Append matched excerpts to `text` under [`KNOWLEDGE_HEADER`].
///
/// Returns `text` unchanged when there are no excerpts.
pub fn augment_message(text: &str, excerpts: &[Excerpt]) -> String {
    if excerpts.is_empty() {
        return text.to_string();
    }

    let block = excerpts
        .iter()
        .map(Excerpt::to_string)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{text}\n\n{KNOWLEDGE_HEADER}\n{block}")
}

/// One conversation with the store assistant.
///
/// Owns its transcript; the knowledge store is shared read-only and can be
/// swapped wholesale between turns.
pub struct ChatSession {
    provider: Arc<dyn CompletionProvider>,
    knowledge: Arc<KnowledgeStore>,
    history: ConversationHistory,
    sampling: SamplingParams,
}

impl ChatSession {
    /// Create a session with fixed sampling parameters
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        knowledge: Arc<KnowledgeStore>,
        sampling: SamplingParams,
    ) -> Self {
        Self {
            provider,
            knowledge,
            history: ConversationHistory::new(),
            sampling,
        }
    }

    /// Append a system message (persona / behaviour instructions)
    pub fn add_system_message(&mut self, content: impl Into<String>) {
        self.history.append(MessageRole::System, content);
    }

    /// Send a user message and return the assistant reply.
    ///
    /// Failures never escape: they come back as text starting with
    /// [`ERROR_PREFIX`]. The user message stays in the history either way.
    pub async fn send(&mut self, user_text: &str) -> String {
        match self.try_send(user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Completion failed");
                format!("{ERROR_PREFIX}{e}")
            }
        }
    }

    /// Send a user message, returning the provider failure as an error.
    ///
    /// The (possibly augmented) user message is appended before the call and
    /// kept on failure; the reply is appended only on success.
    pub async fn try_send(&mut self, user_text: &str) -> Result<String> {
        let excerpts = KnowledgeMatcher::find(user_text, &self.knowledge);
        if !excerpts.is_empty() {
            debug!(
                topics = ?excerpts.iter().map(|e| e.topic.as_str()).collect::<Vec<_>>(),
                "Augmenting message with store knowledge"
            );
        }

        let content = augment_message(user_text, &excerpts);
        self.history.append(MessageRole::User, content);

        let request = CompletionRequest {
            messages: self.history.snapshot(),
            sampling: self.sampling,
        };
        let response = self.provider.complete(&request).await?;

        self.history.append(MessageRole::Assistant, response.content.clone());
        Ok(response.content)
    }

    /// Transcript since the last clear
    pub fn history(&self) -> &[Message] {
        self.history.all()
    }

    /// Empty the transcript, system messages included
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    /// Swap in a freshly loaded knowledge store
    pub fn replace_knowledge(&mut self, knowledge: Arc<KnowledgeStore>) {
        self.knowledge = knowledge;
    }
}
