//! Request handlers for the four JSON endpoints.

use crate::error::StudyDeskError;
use crate::extract::{self, DocumentKind, ExtractionContext, UploadedDocument};
use crate::quiz::{self, QuizDeps, QuizResponse};
use crate::server::AppState;
use crate::summary;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/extract-image", post(extract_image))
        .route("/api/extract-pdf", post(extract_pdf))
        .route("/api/generate-summary", post(generate_summary))
        .route("/api/generate-quiz-response", post(generate_quiz_response))
        .with_state(state)
}

// ── Extraction endpoints ─────────────────────────────────────────────────

#[derive(Serialize)]
struct ExtractResponse {
    text: String,
}

async fn extract_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, StudyDeskError> {
    let doc = read_upload(multipart, DocumentKind::Image).await?;
    let text = run_extraction(&state, &doc).await?;
    Ok(Json(ExtractResponse { text }))
}

async fn extract_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, StudyDeskError> {
    let doc = read_upload(multipart, DocumentKind::Pdf).await?;
    let text = run_extraction(&state, &doc).await?;
    Ok(Json(ExtractResponse { text }))
}

/// Pull the `file` field out of a multipart form.
async fn read_upload(
    mut multipart: Multipart,
    kind: DocumentKind,
) -> Result<UploadedDocument, StudyDeskError> {
    while let Some(field) =
        multipart
            .next_field()
            .await
            .map_err(|e| StudyDeskError::InvalidUpload {
                detail: e.to_string(),
            })?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| StudyDeskError::InvalidUpload {
                detail: e.to_string(),
            })?;
        return Ok(UploadedDocument {
            filename,
            kind,
            bytes: bytes.to_vec(),
        });
    }
    Err(StudyDeskError::MissingFile)
}

async fn run_extraction(
    state: &AppState,
    doc: &UploadedDocument,
) -> Result<String, StudyDeskError> {
    let ctx = ExtractionContext {
        config: &state.config,
        completion: state.completion.as_deref(),
        ocr: state.ocr.as_ref(),
    };
    extract::extract(doc, &ctx).await
}

// ── Generation endpoints ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SummaryRequest {
    lecture_content: String,
    student_inputs: Option<String>,
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, StudyDeskError> {
    let summary = summary::build_lecture_summary(
        &request.lecture_content,
        request.student_inputs.as_deref(),
        state.completion.as_deref(),
        &state.config,
    )
    .await?;
    Ok(Json(SummaryResponse { summary }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QuizRequest {
    paper_content: String,
    news_article_url: Option<String>,
}

async fn generate_quiz_response(
    State(state): State<AppState>,
    Json(request): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, StudyDeskError> {
    let deps = QuizDeps {
        completion: state.completion.as_deref(),
        search: state.search.as_deref(),
        config: &state.config,
    };
    let response = quiz::build_quiz_response(
        &request.paper_content,
        request.news_article_url.as_deref(),
        &deps,
    )
    .await?;
    Ok(Json(response))
}
