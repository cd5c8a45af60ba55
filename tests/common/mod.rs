//! Deterministic provider stubs shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use studydesk::extract::ocr::{OcrEngine, OcrWorker};
use studydesk::{CompletionRequest, GroundedSearchProvider, StudyDeskError, TextCompletionProvider};

pub const STAGE_A_FIXTURE: &str =
    "The mice on the high-fat diet showed a 40% reduction in insulin sensitivity.";
pub const STAGE_B_FIXTURE: &str =
    "They compared a high-fat diet against a normal diet and measured insulin sensitivity over 8 weeks.";
pub const STAGE_C_FIXTURE: &str =
    "The article describes a related metabolic finding that connects to the paper's insulin pathway results.";
pub const SUMMARY_FIXTURE: &str =
    "I learned that diet composition directly modulates insulin signalling.";

/// Completion stub that records every request and answers each pipeline
/// stage by recognising its prompt marker.
pub struct StubCompletion {
    pub calls: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn user_prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.user_prompt.clone())
            .collect()
    }
}

#[async_trait]
impl TextCompletionProvider for StubCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, StudyDeskError> {
        self.calls.lock().unwrap().push(request.clone());
        let prompt = &request.user_prompt;
        let reply = if prompt.contains("most essential result") {
            STAGE_A_FIXTURE
        } else if prompt.contains("experimental logic") {
            STAGE_B_FIXTURE
        } else if prompt.contains("news article") {
            STAGE_C_FIXTURE
        } else if prompt.contains("lecture summary") {
            SUMMARY_FIXTURE
        } else {
            "stub output"
        };
        Ok(reply.to_string())
    }
}

/// Search stub: a fixed raw response, an error, with call counting.
pub struct StubSearch {
    pub raw: Option<String>,
    pub calls: AtomicUsize,
}

impl StubSearch {
    pub fn returning(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            raw: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GroundedSearchProvider for StubSearch {
    async fn find_article_text(&self, _excerpt: &str) -> Result<String, StudyDeskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.raw {
            Some(raw) => Ok(raw.clone()),
            None => Err(StudyDeskError::ProviderError {
                provider: "perplexity",
                status: Some(500),
                detail: "simulated outage".into(),
            }),
        }
    }
}

/// OCR stub with observable acquire/release counts.
pub struct StubOcr {
    pub text: &'static str,
    pub fail: bool,
    pub acquired: AtomicUsize,
    pub released: std::sync::Arc<AtomicUsize>,
}

impl StubOcr {
    pub fn returning(text: &'static str) -> Self {
        Self {
            text,
            fail: false,
            acquired: AtomicUsize::new(0),
            released: std::sync::Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: "",
            fail: true,
            acquired: AtomicUsize::new(0),
            released: std::sync::Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn acquire_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

struct StubOcrWorker {
    text: &'static str,
    fail: bool,
    released: std::sync::Arc<AtomicUsize>,
}

#[async_trait]
impl OcrEngine for StubOcr {
    async fn acquire(&self) -> Result<Box<dyn OcrWorker>, StudyDeskError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StubOcrWorker {
            text: self.text,
            fail: self.fail,
            released: std::sync::Arc::clone(&self.released),
        }))
    }
}

#[async_trait]
impl OcrWorker for StubOcrWorker {
    async fn recognize(&mut self, _image: &[u8]) -> Result<String, StudyDeskError> {
        if self.fail {
            Err(StudyDeskError::ExtractionFailed {
                kind: "image",
                detail: "simulated OCR failure".into(),
            })
        } else {
            Ok(self.text.to_string())
        }
    }

    async fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
