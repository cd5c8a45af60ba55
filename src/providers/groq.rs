//! Groq client: the production [`TextCompletionProvider`].
//!
//! Groq exposes an OpenAI-compatible chat-completions API, so this client is
//! a thin request builder over the shared wire types in the parent module.
//! All prompt content arrives pre-built in the [`CompletionRequest`]; the
//! client adds nothing but transport.

use crate::error::StudyDeskError;
use crate::providers::{
    build_http_client, post_chat, ChatMessage, ChatRequestBody, CompletionRequest,
    TextCompletionProvider,
};
use async_trait::async_trait;
use tracing::debug;

/// Client for Groq's OpenAI-compatible chat-completions endpoint.
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    /// Default API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1";

    /// Create a client with the default base URL and a 60 s timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, StudyDeskError> {
        Self::with_timeout(api_key, 60)
    }

    /// Create a client with an explicit per-call timeout.
    pub fn with_timeout(
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, StudyDeskError> {
        Ok(Self {
            http: build_http_client(timeout_secs)?,
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different OpenAI-compatible endpoint
    /// (a gateway, a proxy, or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextCompletionProvider for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, StudyDeskError> {
        debug!(
            "groq completion: model={} temperature={} max_tokens={}",
            request.model, request.temperature, request.max_tokens
        );

        let body = ChatRequestBody {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        post_chat(&self.http, "groq", &url, &self.api_key, &body).await
    }
}
