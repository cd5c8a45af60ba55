//! Configuration types for the studydesk service.
//!
//! All behaviour is controlled through [`AppConfig`], built via its
//! [`AppConfigBuilder`] or loaded from the environment with
//! [`AppConfig::from_env`]. Keeping every knob in one struct makes it trivial
//! to share the config across handlers, inject test doubles, and diff two
//! deployments to understand why their outputs differ.

use crate::error::StudyDeskError;
use serde::{Deserialize, Serialize};

/// Configuration for the studydesk service.
///
/// # Example
/// ```rust
/// use studydesk::AppConfig;
///
/// let config = AppConfig::builder()
///     .generation_model("llama-3.3-70b-versatile")
///     .excerpt_limit(2000)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the generation provider (Groq). Absence is a hard
    /// configuration error at request time: no completion stage may run
    /// without it.
    pub groq_api_key: Option<String>,

    /// API key for the grounded-search provider (Perplexity). Optional:
    /// absence degrades the quiz pipeline's news-connection stage to a
    /// placeholder instead of failing the request.
    pub perplexity_api_key: Option<String>,

    /// Model used for all generation calls. Default: `llama-3.3-70b-versatile`.
    pub generation_model: String,

    /// Model used for the web-grounded article search.
    /// Default: `llama-3.1-sonar-small-128k-online`.
    pub search_model: String,

    /// Base URL of the generation provider's OpenAI-compatible API.
    /// Overridable so tests and gateways can point elsewhere.
    pub groq_base_url: String,

    /// Base URL of the search provider's API.
    pub perplexity_base_url: String,

    /// Per-provider-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// How PDF uploads are turned into text. Default: [`PdfExtractionMode::Native`].
    pub pdf_mode: PdfExtractionMode,

    /// Tesseract language code for image OCR. Default: `eng`.
    ///
    /// A single language keeps the worker lightweight; the upload form is
    /// English-only coursework.
    pub ocr_language: String,

    /// Maximum number of characters of paper text embedded in the article
    /// search prompt. Default: 3000.
    ///
    /// The search provider only needs enough of the paper to identify its
    /// topic; sending the whole document wastes tokens and can exceed the
    /// search model's context.
    pub excerpt_limit: usize,

    /// Article source allow-list and fallback policy.
    pub article: ArticleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            perplexity_api_key: None,
            generation_model: "llama-3.3-70b-versatile".to_string(),
            search_model: "llama-3.1-sonar-small-128k-online".to_string(),
            groq_base_url: "https://api.groq.com/openai/v1".to_string(),
            perplexity_base_url: "https://api.perplexity.ai".to_string(),
            api_timeout_secs: 60,
            pdf_mode: PdfExtractionMode::default(),
            ocr_language: "eng".to_string(),
            excerpt_limit: 3000,
            article: ArticleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new builder for `AppConfig`.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognised variables: `GROQ_API_KEY`, `PERPLEXITY_API_KEY`,
    /// `STUDYDESK_GENERATION_MODEL`, `STUDYDESK_SEARCH_MODEL`,
    /// `STUDYDESK_PDF_MODE` (`native` | `vision`), `STUDYDESK_OCR_LANG`.
    ///
    /// Empty-string keys are treated as absent, so `GROQ_API_KEY=` in a CI
    /// environment behaves the same as the variable not being set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.groq_api_key = env_nonempty("GROQ_API_KEY");
        config.perplexity_api_key = env_nonempty("PERPLEXITY_API_KEY");
        if let Ok(model) = std::env::var("STUDYDESK_GENERATION_MODEL") {
            config.generation_model = model;
        }
        if let Ok(model) = std::env::var("STUDYDESK_SEARCH_MODEL") {
            config.search_model = model;
        }
        if let Some(mode) = std::env::var("STUDYDESK_PDF_MODE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.pdf_mode = mode;
        }
        if let Ok(lang) = std::env::var("STUDYDESK_OCR_LANG") {
            config.ocr_language = lang;
        }
        config
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for [`AppConfig`].
#[derive(Debug)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.groq_api_key = Some(key.into());
        self
    }

    pub fn perplexity_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.perplexity_api_key = Some(key.into());
        self
    }

    pub fn generation_model(mut self, model: impl Into<String>) -> Self {
        self.config.generation_model = model.into();
        self
    }

    pub fn search_model(mut self, model: impl Into<String>) -> Self {
        self.config.search_model = model.into();
        self
    }

    pub fn groq_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.groq_base_url = url.into();
        self
    }

    pub fn perplexity_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.perplexity_base_url = url.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn pdf_mode(mut self, mode: PdfExtractionMode) -> Self {
        self.config.pdf_mode = mode;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn excerpt_limit(mut self, chars: usize) -> Self {
        self.config.excerpt_limit = chars;
        self
    }

    pub fn article(mut self, article: ArticleConfig) -> Self {
        self.config.article = article;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AppConfig, StudyDeskError> {
        let c = &self.config;
        if c.generation_model.trim().is_empty() {
            return Err(StudyDeskError::InvalidConfig(
                "generation model must not be empty".into(),
            ));
        }
        if c.excerpt_limit == 0 {
            return Err(StudyDeskError::InvalidConfig(
                "excerpt limit must be ≥ 1".into(),
            ));
        }
        if c.article.sources.is_empty() {
            return Err(StudyDeskError::InvalidConfig(
                "article source allow-list must name at least one domain".into(),
            ));
        }
        if c.article.sources.iter().any(|s| s.host.trim().is_empty()) {
            return Err(StudyDeskError::InvalidConfig(
                "article source host must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How PDF uploads are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PdfExtractionMode {
    /// Parse the PDF's embedded text layer locally. (default)
    #[default]
    Native,
    /// Send the PDF as a base64 data URI to the vision-capable completion
    /// model and ask it to transcribe all text. Useful for scanned PDFs
    /// whose text layer is absent or garbled.
    Vision,
}

impl std::str::FromStr for PdfExtractionMode {
    type Err = StudyDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(PdfExtractionMode::Native),
            "vision" => Ok(PdfExtractionMode::Vision),
            other => Err(StudyDeskError::InvalidConfig(format!(
                "unknown PDF extraction mode '{other}' (expected 'native' or 'vision')"
            ))),
        }
    }
}

/// What the quiz pipeline does when no allow-listed article can be resolved.
///
/// The upstream deployments disagreed on this: some hard-errored, some
/// skipped, one fabricated an unverifiable summary. `Skip` is the default
/// because it degrades gracefully without presenting the student with a
/// source that may not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArticleFallback {
    /// Skip the news-connection stage and emit a placeholder sentence. (default)
    #[default]
    Skip,
    /// Fail the whole request with [`StudyDeskError::ArticleUnavailable`].
    Fail,
}

/// Article source allow-list and fallback policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleConfig {
    /// Domains an article URL may come from. A URL is valid only if it
    /// matches one of these AND carries a path beyond the bare domain.
    pub sources: Vec<SourceDomain>,

    /// Behaviour when no valid article is found.
    pub fallback: ArticleFallback,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            sources: vec![SourceDomain {
                host: "sciencedaily.com".to_string(),
                path_prefix: "/releases/".to_string(),
            }],
            fallback: ArticleFallback::default(),
        }
    }
}

/// One allow-listed article source.
///
/// `host` matches the domain itself and any subdomain (`www.` included).
/// `path_prefix` is the path a real article must start with; a URL whose
/// path is exactly the prefix (or shorter) is a listing page or homepage,
/// not an article, and is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDomain {
    pub host: String,
    pub path_prefix: String,
}
