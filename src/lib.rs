//! # studydesk
//!
//! Turn lecture notes and research papers into formatted study artifacts
//! using third-party LLM APIs.
//!
//! ## What it does
//!
//! A student uploads course material as text, PDF, or image. The service
//! extracts plain text from the upload and feeds it through prompt
//! templates sent to a generation provider (Groq) and, optionally, a
//! web-grounded search provider (Perplexity), producing either a lecture
//! summary or a three-part quiz response that references a real science
//! news article.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload
//!  │
//!  ├─ 1. Extract   .txt decode / pdf-extract / scoped OCR worker
//!  ├─ 2. Stage A   one sentence: the paper's essential result
//!  ├─ 3. Stage B   2–3 sentences: experimental logic (embeds Stage A)
//!  ├─ 4. Article   grounded search → validated (url, summary), optional
//!  ├─ 5. Stage C   3–5 sentences connecting paper and article
//!  └─ 6. Output    QuizResponse as JSON
//! ```
//!
//! Every external AI service sits behind a small trait
//! ([`TextCompletionProvider`], [`GroundedSearchProvider`],
//! [`extract::ocr::OcrEngine`]) so tests run against deterministic stubs
//! and providers can be swapped without touching pipeline logic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use studydesk::{build_quiz_response, AppConfig, GroqClient, QuizDeps};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env();
//!     let groq = GroqClient::new(config.groq_api_key.clone().expect("GROQ_API_KEY"))?;
//!     let deps = QuizDeps {
//!         completion: Some(&groq),
//!         search: None,
//!         config: &config,
//!     };
//!     let quiz = build_quiz_response("Researchers fed mice a high-fat diet…", None, &deps).await?;
//!     println!("{}", quiz.essential_result);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the axum HTTP surface and the `studydesk` binary |
//!
//! Disable `server` when using only the pipelines as a library:
//! ```toml
//! studydesk = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod article;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompts;
pub mod providers;
pub mod quiz;
pub mod summary;

#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use article::{find_related_article, CandidateArticle};
pub use config::{
    AppConfig, AppConfigBuilder, ArticleConfig, ArticleFallback, PdfExtractionMode, SourceDomain,
};
pub use error::StudyDeskError;
pub use extract::{extract, DocumentKind, ExtractionContext, UploadedDocument};
pub use providers::{
    CompletionRequest, GroqClient, GroundedSearchProvider, PerplexityClient,
    TextCompletionProvider,
};
pub use quiz::{build_quiz_response, QuizDeps, QuizResponse, QuizStage};
pub use summary::build_lecture_summary;
