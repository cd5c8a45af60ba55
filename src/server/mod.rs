//! HTTP surface for the studydesk service (feature `server`).
//!
//! Thin by design: handlers parse the request, hand off to the library
//! pipelines, and serialise the result. Every failure — expected or not —
//! leaves through [`StudyDeskError`]'s `IntoResponse` impl, so the client
//! always sees `{ "error": "<human-readable>" }` with a status that
//! reflects client vs. server fault, and never an unhandled fault.
//!
//! Cancellation comes for free: axum drops a handler's future when the
//! client disconnects, which aborts any in-flight provider call and
//! prevents later pipeline stages from running. Nothing is cached, so an
//! aborted request leaves no partial state behind.

mod handlers;

pub use handlers::router;

use crate::config::AppConfig;
use crate::error::StudyDeskError;
use crate::extract::ocr::{OcrEngine, TesseractEngine};
use crate::providers::{
    GroqClient, GroundedSearchProvider, PerplexityClient, TextCompletionProvider,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Shared state handed to every handler.
///
/// Providers are `Option` because the service starts (and serves the
/// extraction endpoints) even when API keys are absent; generation
/// endpoints then fail per-request with a configuration error.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub completion: Option<Arc<dyn TextCompletionProvider>>,
    pub search: Option<Arc<dyn GroundedSearchProvider>>,
    pub ocr: Arc<dyn OcrEngine>,
}

impl AppState {
    /// Build production providers from the configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, StudyDeskError> {
        let completion: Option<Arc<dyn TextCompletionProvider>> = match &config.groq_api_key {
            Some(key) => Some(Arc::new(
                GroqClient::with_timeout(key.clone(), config.api_timeout_secs)?
                    .with_base_url(config.groq_base_url.clone()),
            )),
            None => None,
        };
        let search: Option<Arc<dyn GroundedSearchProvider>> = match config.perplexity_api_key {
            Some(_) => Some(Arc::new(PerplexityClient::from_config(&config)?)),
            None => None,
        };
        let ocr: Arc<dyn OcrEngine> = Arc::new(TesseractEngine::new(config.ocr_language.clone()));
        Ok(Self {
            config: Arc::new(config),
            completion,
            search,
            ocr,
        })
    }

    /// Build a state with explicit providers. Intended for tests that
    /// substitute deterministic stubs.
    pub fn with_providers(
        config: AppConfig,
        completion: Option<Arc<dyn TextCompletionProvider>>,
        search: Option<Arc<dyn GroundedSearchProvider>>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            completion,
            search,
            ocr,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for StudyDeskError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server faults carry diagnostics (provider status, response body)
        // that must reach the log but not the client.
        if status.is_server_error() {
            error!("request failed: {:?}", self);
        } else {
            debug!("request rejected: {}", self);
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
