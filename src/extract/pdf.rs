//! PDF text extraction.
//!
//! Two modes:
//!
//! * **Native** — parse the PDF's embedded text layer with `pdf-extract`.
//!   Parsing is CPU-bound and can take seconds on a large document, so it
//!   runs in `spawn_blocking` to keep the async runtime's workers free.
//! * **Vision** — base64-encode the whole document as a data URI and ask
//!   the completion model to transcribe it. Used for scanned PDFs whose
//!   text layer is absent; costs tokens and one provider round-trip.

use crate::config::AppConfig;
use crate::error::StudyDeskError;
use crate::prompts;
use crate::providers::{CompletionRequest, TextCompletionProvider};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Transcription wants determinism, not creativity.
const TRANSCRIBE_TEMPERATURE: f32 = 0.0;

/// Enough for a full multi-page document of plain text.
const TRANSCRIBE_MAX_TOKENS: u32 = 8192;

/// Extract the embedded text layer from PDF bytes.
pub async fn extract_text(bytes: &[u8]) -> Result<String, StudyDeskError> {
    let owned = bytes.to_vec();
    // The parser can panic on malformed input; a panicked task reads the
    // same as a parse error from the caller's side.
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
        .await
        .map_err(|e| StudyDeskError::ExtractionFailed {
            kind: "PDF",
            detail: format!("extraction task failed: {e}"),
        })?
        .map_err(|e| StudyDeskError::ExtractionFailed {
            kind: "PDF",
            detail: e.to_string(),
        })?;
    debug!("pdf-extract produced {} bytes of text", text.len());
    Ok(text)
}

/// Transcribe a PDF by sending it to the vision-capable completion model
/// as a base64 data URI.
pub async fn transcribe_with_vision(
    bytes: &[u8],
    completion: &dyn TextCompletionProvider,
    config: &AppConfig,
) -> Result<String, StudyDeskError> {
    let data_uri = format!("data:application/pdf;base64,{}", STANDARD.encode(bytes));
    debug!("vision PDF transcription: {} bytes encoded", data_uri.len());

    let request = CompletionRequest {
        system_prompt: prompts::PDF_TRANSCRIBE_SYSTEM_PROMPT.to_string(),
        user_prompt: prompts::pdf_transcription_prompt(&data_uri),
        model: config.generation_model.clone(),
        temperature: TRANSCRIBE_TEMPERATURE,
        max_tokens: TRANSCRIBE_MAX_TOKENS,
    };
    completion.complete(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_bytes_fail_as_extraction_error() {
        let err = extract_text(b"this is not a pdf").await.unwrap_err();
        assert!(matches!(
            err,
            StudyDeskError::ExtractionFailed { kind: "PDF", .. }
        ));
    }
}
