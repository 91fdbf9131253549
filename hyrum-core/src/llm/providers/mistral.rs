//! Mistral chat-completions provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::LlmSettings;
use crate::error::{HyrumError, Result};
use crate::llm::retry::{RetryConfig, with_retry};
use crate::llm::{
    CompletionProvider, CompletionRequest, CompletionResponse, Message, ModelInfo, TokenUsage,
};

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Mistral hosted chat API provider.
pub struct MistralProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl MistralProvider {
    /// Create a new Mistral provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Mistral API key
    /// * `model` - Model name (e.g., "mistral-small-latest")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }

    /// Create from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key or model is missing.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                HyrumError::Configuration(
                    "API key not set (MISTRALAI_API_KEY or llm.api_key)".to_string(),
                )
            })?;
        let model = settings
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| {
                HyrumError::Configuration(
                    "model not set (MISTRALAI_MODEL or llm.model)".to_string(),
                )
            })?;

        Ok(Self::new(api_key, model)
            .with_base_url(settings.base_url.clone())
            .with_timeout(settings.request_timeout)
            .with_retry(settings.retry.clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send_once(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = build_request_body(&self.model, request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(HyrumError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let parsed = parse_response(&text)?;
        if let Some(usage) = parsed.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion token usage"
            );
        }
        Ok(parsed)
    }

    fn transport_error(&self, err: reqwest::Error) -> HyrumError {
        if err.is_timeout() {
            HyrumError::Timeout(self.timeout)
        } else {
            HyrumError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct MistralRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct MistralResponse {
    #[serde(default)]
    choices: Vec<MistralChoice>,
    usage: Option<MistralUsage>,
}

#[derive(Deserialize)]
struct MistralChoice {
    message: Option<MistralMessageResponse>,
}

#[derive(Deserialize)]
struct MistralMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct MistralUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[derive(Deserialize)]
struct MistralError {
    message: serde_json::Value,
}

fn build_request_body<'a>(model: &'a str, request: &'a CompletionRequest) -> MistralRequest<'a> {
    MistralRequest {
        model,
        messages: &request.messages,
        max_tokens: request.sampling.max_tokens,
        temperature: request.sampling.temperature,
        top_p: request.sampling.top_p,
    }
}

fn parse_response(text: &str) -> Result<CompletionResponse> {
    let response: MistralResponse = serde_json::from_str(text)
        .map_err(|e| HyrumError::MalformedResponse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| HyrumError::MalformedResponse("response has no choices".to_string()))?
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| HyrumError::MalformedResponse("top choice has no content".to_string()))?;

    let usage = response.usage.map(|u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(CompletionResponse { content, usage })
}

fn api_error_message(text: &str) -> String {
    match serde_json::from_str::<MistralError>(text) {
        Ok(MistralError {
            message: serde_json::Value::String(message),
        }) => message,
        Ok(error) => error.message.to_string(),
        Err(_) if text.trim().is_empty() => "empty error body".to_string(),
        Err(_) => text.trim().to_string(),
    }
}

#[async_trait]
impl CompletionProvider for MistralProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        with_retry(
            &self.retry,
            || self.send_once(request),
            |e: &HyrumError| e.is_transient(&self.retry),
        )
        .await
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "mistral".to_string(),
            model_name: self.model.clone(),
        }
    }
}
