//! Text extraction: turn an uploaded document into plain text.
//!
//! Each supported kind has its own path:
//!
//! * `text` — UTF-8 decode, nothing more
//! * `pdf`  — embedded-text parsing ([`pdf`]), or vision-model
//!   transcription when configured
//! * `image` — a scoped OCR worker ([`ocr`])
//!
//! Extension validation runs BEFORE any extraction work, so a disallowed
//! upload is rejected without spawning a worker or touching the network.
//! Whatever the path, an extraction that yields nothing after trimming is a
//! failure, never an empty success — downstream prompts embedding an empty
//! paper would generate confidently about nothing.

pub mod ocr;
pub mod pdf;

use crate::config::{AppConfig, PdfExtractionMode};
use crate::error::StudyDeskError;
use crate::providers::TextCompletionProvider;
use ocr::OcrEngine;
use tracing::debug;

/// Declared kind of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
    Image,
}

impl DocumentKind {
    /// Allowed filename suffixes for this kind (lowercase, with dot).
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            DocumentKind::Text => &[".txt"],
            DocumentKind::Pdf => &[".pdf"],
            DocumentKind::Image => &[".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp"],
        }
    }

    /// Human description used in the `UnsupportedFileType` message.
    fn expected(self) -> &'static str {
        match self {
            DocumentKind::Text => "a plain text file (.txt)",
            DocumentKind::Pdf => "a PDF",
            DocumentKind::Image => "an image (PNG, JPG, JPEG, GIF, BMP, or WebP)",
        }
    }

    /// Kind-specific error for an extraction that produced no text.
    fn no_text_error(self) -> StudyDeskError {
        match self {
            DocumentKind::Text => StudyDeskError::NoTextFound {
                kind: "file",
                hint: "The file appears to be empty.",
            },
            DocumentKind::Pdf => StudyDeskError::NoTextFound {
                kind: "PDF",
                hint: "The file might be empty or contain only images.",
            },
            DocumentKind::Image => StudyDeskError::NoTextFound {
                kind: "image",
                hint: "Please make sure the image contains readable text.",
            },
        }
    }
}

/// An uploaded document: raw bytes plus what the client claims it is.
///
/// Request-scoped — created from the multipart form, consumed once by
/// [`extract`], then dropped. Nothing is persisted.
#[derive(Debug)]
pub struct UploadedDocument {
    pub filename: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

/// Everything [`extract`] needs beyond the document itself.
pub struct ExtractionContext<'a> {
    pub config: &'a AppConfig,
    /// Only needed in [`PdfExtractionMode::Vision`]; `None` when the
    /// generation provider is unconfigured.
    pub completion: Option<&'a dyn TextCompletionProvider>,
    pub ocr: &'a dyn OcrEngine,
}

/// Check the filename suffix against the allow-list for `kind`.
///
/// Case-insensitive exact-suffix match, run before any extraction work.
pub fn validate_extension(filename: &str, kind: DocumentKind) -> Result<(), StudyDeskError> {
    let lower = filename.to_lowercase();
    if kind
        .allowed_extensions()
        .iter()
        .any(|ext| lower.ends_with(ext))
    {
        Ok(())
    } else {
        Err(StudyDeskError::UnsupportedFileType {
            expected: kind.expected(),
        })
    }
}

/// Extract plain text from an uploaded document.
///
/// Returns the text trimmed of surrounding whitespace. An empty result is
/// reported as [`StudyDeskError::NoTextFound`] with a kind-specific hint.
pub async fn extract(
    doc: &UploadedDocument,
    ctx: &ExtractionContext<'_>,
) -> Result<String, StudyDeskError> {
    validate_extension(&doc.filename, doc.kind)?;
    debug!("extracting text: {} ({:?})", doc.filename, doc.kind);

    let text = match doc.kind {
        DocumentKind::Text => std::str::from_utf8(&doc.bytes)
            .map_err(|e| StudyDeskError::ExtractionFailed {
                kind: "text file",
                detail: format!("not valid UTF-8: {e}"),
            })?
            .to_string(),
        DocumentKind::Pdf => match ctx.config.pdf_mode {
            PdfExtractionMode::Native => pdf::extract_text(&doc.bytes).await?,
            PdfExtractionMode::Vision => {
                let completion =
                    ctx.completion
                        .ok_or(StudyDeskError::ProviderNotConfigured {
                            provider: "Groq",
                        })?;
                pdf::transcribe_with_vision(&doc.bytes, completion, ctx.config).await?
            }
        },
        DocumentKind::Image => ocr::recognize_scoped(ctx.ocr, &doc.bytes).await?,
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(doc.kind.no_text_error());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(validate_extension("Notes.TXT", DocumentKind::Text).is_ok());
        assert!(validate_extension("scan.JPeg", DocumentKind::Image).is_ok());
        assert!(validate_extension("paper.PDF", DocumentKind::Pdf).is_ok());
    }

    #[test]
    fn disallowed_extensions_rejected() {
        let err = validate_extension("malware.exe", DocumentKind::Image).unwrap_err();
        assert_eq!(
            err.to_string(),
            "File must be an image (PNG, JPG, JPEG, GIF, BMP, or WebP)"
        );

        let err = validate_extension("paper.docx", DocumentKind::Pdf).unwrap_err();
        assert_eq!(err.to_string(), "File must be a PDF");
    }

    #[test]
    fn extension_must_be_a_suffix() {
        // ".png" appearing mid-name is not enough
        assert!(validate_extension("trick.png.exe", DocumentKind::Image).is_err());
        assert!(validate_extension("pdf", DocumentKind::Pdf).is_err());
    }
}
