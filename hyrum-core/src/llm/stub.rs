//! Scripted completion provider for deterministic, offline sessions.
//!
//! Replies are returned in the order they were queued and every request is
//! recorded, so tests can assert on exactly what the session sent.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::error::{HyrumError, Result};
use crate::llm::{CompletionProvider, CompletionRequest, CompletionResponse, ModelInfo};

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Successful completion with this content
    Text(String),
    /// API failure with this status and message
    ApiError { status: u16, message: String },
    /// Transport failure
    Transport(String),
    /// Timeout after the given wait
    Timeout(Duration),
}

impl ScriptedReply {
    fn into_result(self) -> Result<CompletionResponse> {
        match self {
            ScriptedReply::Text(content) => Ok(CompletionResponse::new(content)),
            ScriptedReply::ApiError { status, message } => Err(HyrumError::Api { status, message }),
            ScriptedReply::Transport(message) => Err(HyrumError::Transport(message)),
            ScriptedReply::Timeout(wait) => Err(HyrumError::Timeout(wait)),
        }
    }
}

/// Provider that replays queued replies and records requests
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with replies returned in order
    pub fn with_replies(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider whose every call succeeds with `content`
    pub fn replying(content: impl Into<String>) -> Self {
        Self::with_replies([ScriptedReply::Text(content.into())])
    }

    /// Provider whose every call fails at the transport level
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_replies([ScriptedReply::Transport(message.into())])
    }

    /// All requests received so far
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().await.push(request.clone());

        let mut replies = self.replies.lock().await;
        // the last reply repeats once the script is exhausted
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };

        reply
            .ok_or_else(|| HyrumError::Transport("no scripted reply queued".to_string()))?
            .into_result()
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "scripted".to_string(),
            model_name: "none".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Message, SamplingParams};

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::user(text)],
            sampling: SamplingParams::default(),
        }
    }

    #[tokio::test]
    async fn test_replies_in_order_then_repeat_last() {
        let provider = ScriptedProvider::with_replies([
            ScriptedReply::Text("one".into()),
            ScriptedReply::Text("two".into()),
        ]);

        assert_eq!(provider.complete(&request("a")).await.unwrap().content, "one");
        assert_eq!(provider.complete(&request("b")).await.unwrap().content, "two");
        assert_eq!(provider.complete(&request("c")).await.unwrap().content, "two");
        assert_eq!(provider.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let provider = ScriptedProvider::replying("ok");
        provider.complete(&request("hello")).await.unwrap();

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0].content, "hello");
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let provider = ScriptedProvider::with_replies([ScriptedReply::ApiError {
            status: 401,
            message: "Unauthorized".into(),
        }]);
        let err = provider.complete(&request("x")).await.err().unwrap();
        assert!(matches!(err, HyrumError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_empty_script_fails() {
        let provider = ScriptedProvider::new();
        assert!(provider.complete(&request("x")).await.is_err());
    }
}
