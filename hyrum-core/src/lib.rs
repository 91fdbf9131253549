//! # Hyrum - Store Assistant Core
//!
//! Conversation core for the HyrumGames customer-service assistant:
//! - Store knowledge base loaded from a JSON file, with a built-in fallback
//! - Keyword matching that grounds user messages in store policy text
//! - Append-only conversation transcript
//! - Chat session forwarding the full transcript to a hosted completion API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hyrum_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = HyrumConfig::load(None)?;
//!     let provider = Arc::new(MistralProvider::from_settings(&config.llm)?);
//!     let store = Arc::new(KnowledgeStore::load(&config.knowledge.path)?);
//!
//!     let mut session = ChatSession::new(provider, store, config.llm.sampling);
//!     session.add_system_message("Você é um atendente da loja.");
//!
//!     let reply = session.send("Qual a política de reembolso?").await;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod conversation;
pub mod error;
pub mod knowledge;
pub mod llm;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{HyrumConfig, KnowledgeConfig, LlmSettings, SessionConfig};
    pub use crate::conversation::{ChatSession, ConversationHistory, ERROR_PREFIX};
    pub use crate::error::{HyrumError, Result};
    pub use crate::knowledge::{
        Excerpt, KnowledgeMatcher, KnowledgeOrigin, KnowledgeRecord, KnowledgeStore,
    };
    pub use crate::llm::{
        CompletionProvider, CompletionRequest, CompletionResponse, Message, MessageRole,
        MistralProvider, RetryConfig, SamplingParams, ScriptedProvider, ScriptedReply,
    };
}
