//! Conversation Session Management
//!
//! Transcript handling and the chat session that grounds user messages in
//! the store knowledge base before forwarding them to the provider.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use hyrum_core::conversation::ChatSession;
//! use hyrum_core::knowledge::KnowledgeStore;
//! use hyrum_core::llm::{SamplingParams, ScriptedProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = Arc::new(ScriptedProvider::replying("Olá!"));
//!     let store = Arc::new(KnowledgeStore::default_store());
//!     let mut session = ChatSession::new(provider, store, SamplingParams::default());
//!
//!     session.add_system_message("Você é um atendente da loja.");
//!     assert_eq!(session.send("Oi").await, "Olá!");
//!     assert_eq!(session.history().len(), 3);
//! }
//! ```

mod history;
mod session;

pub use history::ConversationHistory;
pub use session::{ChatSession, ERROR_PREFIX, KNOWLEDGE_HEADER, augment_message};
