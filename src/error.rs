//! Error types for the studydesk library.
//!
//! A single [`StudyDeskError`] enum covers every failure a request can hit.
//! Each variant knows which side of the client/server line it falls on via
//! [`StudyDeskError::status_code`], so the HTTP layer never has to re-derive
//! blame from message text.
//!
//! One failure mode is deliberately NOT here: article resolution finding
//! nothing. That is optional enrichment, modelled as `Ok(None)` at the
//! resolver boundary (see [`crate::article`]) and downgraded to a placeholder
//! in the pipeline rather than surfaced as a request failure.

use thiserror::Error;

/// All errors returned by the studydesk library.
#[derive(Debug, Error)]
pub enum StudyDeskError {
    // ── Input errors (client fault, 400) ─────────────────────────────────
    /// The multipart upload did not contain a `file` field.
    #[error("No file provided")]
    MissingFile,

    /// The upload could not be read as a multipart form.
    #[error("Invalid upload: {detail}")]
    InvalidUpload { detail: String },

    /// A required text field was empty after trimming.
    ///
    /// The hint is the exact sentence shown to the student, so it differs
    /// per endpoint ("Please add the paper content first" vs. "Please add
    /// some lecture content first").
    #[error("{hint}")]
    EmptyInput { hint: &'static str },

    /// The uploaded file's extension is not in the allow-list for its kind.
    #[error("File must be {expected}")]
    UnsupportedFileType { expected: &'static str },

    /// Extraction ran but produced nothing usable.
    #[error("No text found in {kind}. {hint}")]
    NoTextFound {
        kind: &'static str,
        hint: &'static str,
    },

    // ── Configuration errors (server fault, 500) ─────────────────────────
    /// A required API key is absent from the environment.
    #[error("{provider} API key is not configured. Please contact the administrator.")]
    ProviderNotConfigured { provider: &'static str },

    // ── Provider errors (server fault, 500) ──────────────────────────────
    /// An upstream call returned a non-success status or failed outright.
    ///
    /// `status` is `None` when the request never got a response (connect
    /// error, timeout). The response body is kept in `detail` for
    /// diagnostics; handlers log it before replying.
    #[error("{provider} request failed: {detail}")]
    ProviderError {
        provider: &'static str,
        status: Option<u16>,
        detail: String,
    },

    /// The upstream call succeeded but the response carried no usable text.
    ///
    /// Never silently substituted with an empty string — an empty field in a
    /// QuizResponse would read as success to any downstream check.
    #[error("{provider} returned a response with no content")]
    NoContent { provider: &'static str },

    /// No allow-listed article could be resolved and the configured
    /// fallback policy is [`crate::config::ArticleFallback::Fail`].
    #[error("Could not find a relevant news article. Please provide one explicitly and try again.")]
    ArticleUnavailable,

    // ── Extraction errors (server fault, 500) ────────────────────────────
    /// OCR or PDF parsing threw.
    #[error("Failed to extract text from {kind}: {detail}")]
    ExtractionFailed {
        kind: &'static str,
        detail: String,
    },

    // ── Config errors ────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudyDeskError {
    /// HTTP status code for this error: 400 for client faults, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self {
            StudyDeskError::MissingFile
            | StudyDeskError::InvalidUpload { .. }
            | StudyDeskError::EmptyInput { .. }
            | StudyDeskError::UnsupportedFileType { .. }
            | StudyDeskError::NoTextFound { .. } => 400,
            _ => 500,
        }
    }
}
