//! Provider capability traits and the OpenAI-compatible wire format.
//!
//! Every external AI service the pipelines touch is reached through one of
//! two small traits so that pipeline logic never knows which vendor sits
//! behind a call and tests can substitute deterministic stubs:
//!
//! * [`TextCompletionProvider`] — plain text generation (Groq in production)
//! * [`GroundedSearchProvider`] — web-search-augmented generation returning
//!   free-form text with an article URL and summary (Perplexity in
//!   production)
//!
//! Both production providers speak the OpenAI chat-completions wire format,
//! so the request/response serde types live here and are shared.

pub mod groq;
pub mod perplexity;

pub use groq::GroqClient;
pub use perplexity::PerplexityClient;

use crate::error::StudyDeskError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An immutable, fully-specified completion request.
///
/// Built once per pipeline stage and never mutated afterwards; the provider
/// only reads it.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A text-generation capability.
///
/// One network attempt per call: no retry, no backoff. A failed call
/// surfaces immediately as a pipeline failure.
#[async_trait]
pub trait TextCompletionProvider: Send + Sync {
    /// Run one completion and return the generated text.
    ///
    /// A response without usable content is
    /// [`StudyDeskError::NoContent`], never an empty string.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, StudyDeskError>;
}

/// A web-search-augmented generation capability.
///
/// Returns the raw model text, expected (but not guaranteed) to contain
/// `URL:` and `SUMMARY:` lines. Parsing and validation belong to
/// [`crate::article`], not to the provider.
#[async_trait]
pub trait GroundedSearchProvider: Send + Sync {
    async fn find_article_text(&self, excerpt: &str) -> Result<String, StudyDeskError>;
}

// ── OpenAI-compatible wire format ────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequestBody<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseBody {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// POST a chat-completions request and extract the first choice's content.
///
/// Shared by both production clients. Maps the three failure modes the
/// callers care about:
/// * transport error → `ProviderError { status: None }`
/// * non-success status → `ProviderError` carrying the status and body
/// * missing/empty content → `NoContent`
pub(crate) async fn post_chat(
    http: &reqwest::Client,
    provider: &'static str,
    url: &str,
    api_key: &str,
    body: &ChatRequestBody<'_>,
) -> Result<String, StudyDeskError> {
    let response = http
        .post(url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| StudyDeskError::ProviderError {
            provider,
            status: None,
            detail: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        tracing::warn!("{} returned HTTP {}: {}", provider, status, body_text);
        return Err(StudyDeskError::ProviderError {
            provider,
            status: Some(status.as_u16()),
            detail: truncate_detail(&body_text),
        });
    }

    let parsed: ChatResponseBody =
        response
            .json()
            .await
            .map_err(|e| StudyDeskError::ProviderError {
                provider,
                status: Some(status.as_u16()),
                detail: format!("response was not valid JSON: {e}"),
            })?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(StudyDeskError::NoContent { provider })?;

    Ok(content)
}

/// Keep error bodies diagnosable without carrying megabytes of HTML around.
fn truncate_detail(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}… [truncated]", &body[..end])
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, StudyDeskError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| StudyDeskError::Internal(format!("failed to build HTTP client: {e}")))
}
