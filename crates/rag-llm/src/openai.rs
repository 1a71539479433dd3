//! OpenAI-compatible chat completion client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use rag_core::{Generator, LlmConfig, RagError, Result};

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of a `/chat/completions` request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Body of a `/chat/completions` response. Unused fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,

    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting reported by the server.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl ChatResponse {
    /// Content of the first choice.
    pub fn into_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| RagError::completion("response contained no choices"))?
            .message
            .content
            .ok_or_else(|| RagError::completion("first choice has no content"))
    }
}

/// Client for any server speaking the OpenAI chat completions API.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiClient {
    /// Create a client from configuration.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            "Completion client: base_url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Request body for a system prompt followed by the raw question.
    pub fn request<'a>(&'a self, system_prompt: &str, question: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(question)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn generate(&self, system_prompt: &str, question: &str) -> Result<String> {
        let start = Instant::now();
        let body = self.request(system_prompt, question);

        debug!(
            "Sending completion request: model={}, prompt_chars={}",
            self.model,
            system_prompt.len()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Completion endpoint error: {}", status);
            return Err(RagError::completion(format!("{} - {}", status, text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        if let Some(usage) = parsed.usage {
            debug!(
                "Token usage: prompt={}, completion={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let content = parsed.into_content()?;

        info!(
            "Completion finished in {}ms ({} chars)",
            start.elapsed().as_millis(),
            content.len()
        );

        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
