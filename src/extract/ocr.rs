//! Scoped OCR: acquire a worker, recognise once, always release.
//!
//! The OCR engine behind an image upload holds real resources — a scratch
//! directory and a child process. Leaking either across requests would
//! accumulate until the host runs out of descriptors or disk, so the worker
//! lifecycle is an explicit acquire/use/release block:
//!
//! * [`OcrEngine::acquire`] creates a worker for exactly one recognition
//! * [`OcrWorker::recognize`] runs it
//! * [`OcrWorker::release`] tears it down — called on EVERY exit path by
//!   [`recognize_scoped`], including recognition errors
//!
//! Workers are never pooled or reused across requests; each request gets
//! its own. Pooling would be a valid optimisation but is not needed for
//! correctness at this traffic level.

use crate::error::StudyDeskError;
use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Creates OCR workers, one per extraction call.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn OcrWorker>, StudyDeskError>;
}

/// A single-use OCR worker.
#[async_trait]
pub trait OcrWorker: Send {
    /// Recognise text in the given image bytes.
    async fn recognize(&mut self, image: &[u8]) -> Result<String, StudyDeskError>;

    /// Release the worker's resources. Idempotent; called exactly once per
    /// extraction by [`recognize_scoped`].
    async fn release(&mut self);
}

/// Run one recognition inside a guaranteed acquire/use/release scope.
///
/// `release` runs whether `recognize` succeeded, returned empty text, or
/// errored. Release failures are logged, not propagated — the recognition
/// outcome is what the caller needs.
pub async fn recognize_scoped(
    engine: &dyn OcrEngine,
    image: &[u8],
) -> Result<String, StudyDeskError> {
    let mut worker = engine.acquire().await?;
    let result = worker.recognize(image).await;
    worker.release().await;
    result
}

// ── Tesseract implementation ─────────────────────────────────────────────

/// OCR engine backed by the `tesseract` command-line tool.
pub struct TesseractEngine {
    language: String,
}

impl TesseractEngine {
    /// Create an engine for one recognition language (e.g. `eng`).
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn acquire(&self) -> Result<Box<dyn OcrWorker>, StudyDeskError> {
        let scratch = TempDir::new().map_err(|e| StudyDeskError::ExtractionFailed {
            kind: "image",
            detail: format!("failed to create OCR scratch directory: {e}"),
        })?;
        debug!("ocr worker acquired: {}", scratch.path().display());
        Ok(Box::new(TesseractWorker {
            language: self.language.clone(),
            scratch: Some(scratch),
        }))
    }
}

/// One tesseract invocation with its scratch directory.
struct TesseractWorker {
    language: String,
    /// `Some` until released. Taking it in `release` makes teardown
    /// deterministic and observable instead of relying on drop order.
    scratch: Option<TempDir>,
}

#[async_trait]
impl OcrWorker for TesseractWorker {
    async fn recognize(&mut self, image: &[u8]) -> Result<String, StudyDeskError> {
        let scratch = self
            .scratch
            .as_ref()
            .ok_or_else(|| StudyDeskError::Internal("OCR worker used after release".into()))?;

        let input_path = scratch.path().join("input");
        let output_base = scratch.path().join("out");

        tokio::fs::write(&input_path, image)
            .await
            .map_err(|e| StudyDeskError::ExtractionFailed {
                kind: "image",
                detail: format!("failed to stage image for OCR: {e}"),
            })?;

        let output = tokio::process::Command::new("tesseract")
            .arg(&input_path)
            .arg(&output_base)
            .args(["-l", &self.language])
            .output()
            .await
            .map_err(|e| StudyDeskError::ExtractionFailed {
                kind: "image",
                detail: format!("failed to run tesseract: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StudyDeskError::ExtractionFailed {
                kind: "image",
                detail: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        tokio::fs::read_to_string(output_base.with_extension("txt"))
            .await
            .map_err(|e| StudyDeskError::ExtractionFailed {
                kind: "image",
                detail: format!("failed to read OCR output: {e}"),
            })
    }

    async fn release(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            let path = scratch.path().display().to_string();
            if let Err(e) = scratch.close() {
                warn!("failed to remove OCR scratch directory {}: {}", path, e);
            } else {
                debug!("ocr worker released: {}", path);
            }
        }
    }
}
