//! Conversation transcript

use serde::{Deserialize, Serialize};

use crate::llm::{Message, MessageRole};

/// Ordered, append-only transcript sent verbatim to the completion provider.
///
/// Only [`ConversationHistory::clear`] removes messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of the transcript
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// All messages, oldest first.
    ///
    /// The returned slice borrows the history, so it can never observe a
    /// later append; use [`ConversationHistory::snapshot`] to keep a copy.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Owned copy of the current transcript
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Remove every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
