//! Perplexity client: the production [`GroundedSearchProvider`].
//!
//! Perplexity's online models browse the web while completing, which is what
//! makes the article search "grounded": the URL in the response is supposed
//! to be a page the model actually visited. The client owns the search
//! prompt (built from the configured source allow-list at construction) so
//! the pipeline only ever hands it a paper excerpt.

use crate::config::AppConfig;
use crate::error::StudyDeskError;
use crate::providers::{
    build_http_client, post_chat, ChatMessage, ChatRequestBody, GroundedSearchProvider,
};
use crate::prompts;
use async_trait::async_trait;
use tracing::debug;

/// Sampling temperature for the article search. Close to zero: we want the
/// model to report what it found, not improvise.
const SEARCH_TEMPERATURE: f32 = 0.1;

/// Token budget for the search response: a URL plus a multi-paragraph
/// summary of the article's findings.
const SEARCH_MAX_TOKENS: u32 = 2500;

/// Client for Perplexity's search-augmented chat-completions endpoint.
pub struct PerplexityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    system_prompt: String,
    sources: Vec<crate::config::SourceDomain>,
}

impl PerplexityClient {
    /// Create a client from the service configuration.
    ///
    /// Fails with [`StudyDeskError::ProviderNotConfigured`] when no
    /// Perplexity API key is present; callers that can degrade (the quiz
    /// pipeline) treat that as "no search available" rather than an error.
    pub fn from_config(config: &AppConfig) -> Result<Self, StudyDeskError> {
        let api_key = config
            .perplexity_api_key
            .clone()
            .ok_or(StudyDeskError::ProviderNotConfigured {
                provider: "Perplexity",
            })?;
        Ok(Self {
            http: build_http_client(config.api_timeout_secs)?,
            api_key,
            base_url: config.perplexity_base_url.clone(),
            model: config.search_model.clone(),
            system_prompt: prompts::article_search_system_prompt(&config.article.sources),
            sources: config.article.sources.clone(),
        })
    }
}

#[async_trait]
impl GroundedSearchProvider for PerplexityClient {
    async fn find_article_text(&self, excerpt: &str) -> Result<String, StudyDeskError> {
        debug!("perplexity article search: model={}", self.model);

        let user_prompt = prompts::article_search_prompt(excerpt, &self.sources);
        let body = ChatRequestBody {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: SEARCH_TEMPERATURE,
            max_tokens: SEARCH_MAX_TOKENS,
        };

        let url = format!("{}/chat/completions", self.base_url);
        post_chat(&self.http, "perplexity", &url, &self.api_key, &body).await
    }
}
