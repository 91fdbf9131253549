//! Store knowledge base
//!
//! A small curated mapping of topic → policy text, loaded once from a JSON
//! file, plus the keyword matcher that picks the records relevant to a
//! user message.
//!
//! # Example
//!
//! ```rust
//! use hyrum_core::knowledge::{KnowledgeMatcher, KnowledgeStore};
//!
//! let store = KnowledgeStore::from_json_str(
//!     r#"{"reembolso": {"texto_completo": "5 dias úteis"}}"#,
//! )
//! .unwrap();
//!
//! let excerpts = KnowledgeMatcher::find("Quero REEMBOLSO", &store);
//! assert_eq!(excerpts.len(), 1);
//! assert_eq!(excerpts[0].to_string(), "🔹 REEMBOLSO: 5 dias úteis");
//! ```

mod matcher;
mod store;

pub use matcher::{Excerpt, KnowledgeMatcher};
pub use store::{DEFAULT_TOPIC, KnowledgeOrigin, KnowledgeRecord, KnowledgeStore};
