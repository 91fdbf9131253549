//! Remote chat-completion collaborator.
//!
//! The session only talks to [`CompletionProvider`]; the Mistral HTTP client
//! and the scripted test provider both implement it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

pub mod providers;
pub mod retry;
pub mod stub;

pub use providers::MistralProvider;
pub use retry::{RetryConfig, with_retry};
pub use stub::{ScriptedProvider, ScriptedReply};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Sampling parameters sent with every completion call of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation (0.0-2.0)
    pub temperature: f32,

    /// Nucleus-sampling threshold (0.0-1.0]
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 250,
            temperature: 0.5,
            top_p: 0.9,
        }
    }
}

impl SamplingParams {
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p.clamp(0.0, 1.0);
        self
    }
}

/// Request to a completion provider
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Full transcript, oldest first
    pub messages: Vec<Message>,

    pub sampling: SamplingParams,
}

/// Response from a completion provider
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Content of the top choice
    pub content: String,

    /// Token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

/// Trait for chat-completion backends.
///
/// Implementations return an explicit `Result`; the caller decides how a
/// failure is presented.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete the conversation in `request` and return the top choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}
