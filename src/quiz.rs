//! The quiz response pipeline: three sequential generation stages.
//!
//! ## Pipeline Overview
//!
//! ```text
//! paper text
//!  │
//!  ├─ Validate   non-empty after trimming
//!  ├─ Stage A    one sentence: the paper's essential result
//!  ├─ Stage B    2–3 sentences: the experimental logic (embeds Stage A)
//!  ├─ Stage C    3–5 sentences: connection to a news article (conditional)
//!  └─ Assemble   QuizResponse
//! ```
//!
//! Stages are deliberately serialized even though Stage C barely depends on
//! A/B: Stage B's prompt embeds Stage A's output verbatim, so A must finish
//! first, and running C last keeps the flow a single readable sequence with
//! one suspension point per provider call.
//!
//! The stage machine ([`QuizStage`]) is explicit rather than implied by
//! control flow so the "B depends on A; C is optional" contract is visible
//! and testable. No backward transitions exist; any required-stage failure
//! aborts the pipeline — partial responses are never returned.

use crate::article;
use crate::config::{AppConfig, ArticleFallback};
use crate::error::StudyDeskError;
use crate::prompts::{self, ArticleContext};
use crate::providers::{CompletionRequest, GroundedSearchProvider, TextCompletionProvider};
use serde::Serialize;
use tracing::{debug, info};

// Per-stage sampling knobs. Generation stages run warm — the persona is a
// student paraphrasing, not a transcriber — and each stage gets only the
// token budget its sentence count needs.
const ESSENTIAL_RESULT_TEMPERATURE: f32 = 0.8;
const ESSENTIAL_RESULT_MAX_TOKENS: u32 = 150;
const LOGIC_TEMPERATURE: f32 = 0.8;
const LOGIC_MAX_TOKENS: u32 = 300;
const NEWS_CONNECTION_TEMPERATURE: f32 = 0.85;
const NEWS_CONNECTION_MAX_TOKENS: u32 = 500;

/// States of the quiz pipeline.
///
/// `Start → Validated → StageADone → StageBDone → (StageCDone |
/// StageCSkipped) → Complete`, forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStage {
    Start,
    Validated,
    StageADone,
    StageBDone,
    StageCDone,
    StageCSkipped,
    Complete,
}

impl QuizStage {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: QuizStage) -> bool {
        use QuizStage::*;
        matches!(
            (self, next),
            (Start, Validated)
                | (Validated, StageADone)
                | (StageADone, StageBDone)
                | (StageBDone, StageCDone)
                | (StageBDone, StageCSkipped)
                | (StageCDone, Complete)
                | (StageCSkipped, Complete)
        )
    }

    fn advance(&mut self, next: QuizStage) {
        debug_assert!(
            self.can_advance_to(next),
            "illegal quiz stage transition {self:?} → {next:?}"
        );
        debug!("quiz stage: {:?} → {:?}", self, next);
        *self = next;
    }
}

/// The assembled three-part quiz answer.
///
/// `essential_result` and `logic` are always populated (or the whole
/// request failed). `news_connection` holds either Stage C's output or the
/// documented placeholder; `suggested_article_url` is present only when the
/// article resolver found one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub essential_result: String,
    pub logic: String,
    pub news_connection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_article_url: Option<String>,
}

/// Capabilities the pipeline draws on.
pub struct QuizDeps<'a> {
    /// `None` when the generation provider is unconfigured. Checked after
    /// input validation so an empty form reads as client fault (400), not
    /// a server misconfiguration (500).
    pub completion: Option<&'a dyn TextCompletionProvider>,
    /// `None` when no search provider is configured; Stage C then degrades
    /// per the article fallback policy without touching Stage A/B.
    pub search: Option<&'a dyn GroundedSearchProvider>,
    pub config: &'a AppConfig,
}

/// Build a quiz response for the given paper text.
///
/// `news_article_url` short-circuits article resolution: when the caller
/// already knows which article to connect to, no search call is made and
/// Stage C reasons from the URL alone.
pub async fn build_quiz_response(
    paper_text: &str,
    news_article_url: Option<&str>,
    deps: &QuizDeps<'_>,
) -> Result<QuizResponse, StudyDeskError> {
    let mut stage = QuizStage::Start;

    // ── Validate ─────────────────────────────────────────────────────────
    let paper = paper_text.trim();
    if paper.is_empty() {
        return Err(StudyDeskError::EmptyInput {
            hint: "Please add the paper content first",
        });
    }
    stage.advance(QuizStage::Validated);

    let completion = deps
        .completion
        .ok_or(StudyDeskError::ProviderNotConfigured { provider: "Groq" })?;

    // ── Stage A: essential result ────────────────────────────────────────
    let essential_result = completion
        .complete(&stage_request(
            deps.config,
            prompts::essential_result_prompt(paper),
            ESSENTIAL_RESULT_TEMPERATURE,
            ESSENTIAL_RESULT_MAX_TOKENS,
        ))
        .await?;
    stage.advance(QuizStage::StageADone);

    // ── Stage B: experimental logic (embeds Stage A verbatim) ────────────
    let logic = completion
        .complete(&stage_request(
            deps.config,
            prompts::experimental_logic_prompt(paper, &essential_result),
            LOGIC_TEMPERATURE,
            LOGIC_MAX_TOKENS,
        ))
        .await?;
    stage.advance(QuizStage::StageBDone);

    // ── Stage C: news connection (conditional) ───────────────────────────
    let override_url = news_article_url.map(str::trim).filter(|u| !u.is_empty());

    let (news_connection, suggested_article_url) = if let Some(url) = override_url {
        let text = completion
            .complete(&stage_request(
                deps.config,
                prompts::news_connection_prompt(paper, &ArticleContext::UrlOnly(url)),
                NEWS_CONNECTION_TEMPERATURE,
                NEWS_CONNECTION_MAX_TOKENS,
            ))
            .await?;
        stage.advance(QuizStage::StageCDone);
        (text, None)
    } else {
        let resolved = match deps.search {
            Some(search) => article::find_related_article(search, paper, deps.config).await,
            None => None,
        };
        match resolved {
            Some(found) => {
                let text = completion
                    .complete(&stage_request(
                        deps.config,
                        prompts::news_connection_prompt(
                            paper,
                            &ArticleContext::Summary(&found.summary),
                        ),
                        NEWS_CONNECTION_TEMPERATURE,
                        NEWS_CONNECTION_MAX_TOKENS,
                    ))
                    .await?;
                stage.advance(QuizStage::StageCDone);
                (text, Some(found.url))
            }
            None => match deps.config.article.fallback {
                ArticleFallback::Skip => {
                    stage.advance(QuizStage::StageCSkipped);
                    (prompts::NO_ARTICLE_PLACEHOLDER.to_string(), None)
                }
                ArticleFallback::Fail => return Err(StudyDeskError::ArticleUnavailable),
            },
        }
    };
    stage.advance(QuizStage::Complete);

    info!(
        "quiz response complete (news connection: {})",
        if suggested_article_url.is_some() || override_url.is_some() {
            "generated"
        } else {
            "skipped"
        }
    );

    Ok(QuizResponse {
        essential_result,
        logic,
        news_connection,
        suggested_article_url,
    })
}

fn stage_request(
    config: &AppConfig,
    user_prompt: String,
    temperature: f32,
    max_tokens: u32,
) -> CompletionRequest {
    CompletionRequest {
        system_prompt: prompts::QUIZ_SYSTEM_PROMPT.to_string(),
        user_prompt,
        model: config.generation_model.clone(),
        temperature,
        max_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_forward_path() {
        use QuizStage::*;
        assert!(Start.can_advance_to(Validated));
        assert!(Validated.can_advance_to(StageADone));
        assert!(StageADone.can_advance_to(StageBDone));
        assert!(StageBDone.can_advance_to(StageCDone));
        assert!(StageBDone.can_advance_to(StageCSkipped));
        assert!(StageCDone.can_advance_to(Complete));
        assert!(StageCSkipped.can_advance_to(Complete));
    }

    #[test]
    fn no_backward_or_skipping_transitions() {
        use QuizStage::*;
        assert!(!Validated.can_advance_to(Start));
        assert!(!StageBDone.can_advance_to(StageADone));
        assert!(!Start.can_advance_to(StageADone));
        assert!(!Validated.can_advance_to(StageBDone));
        assert!(!StageADone.can_advance_to(Complete));
        assert!(!Complete.can_advance_to(Start));
    }

    #[test]
    fn quiz_response_serialises_camel_case_and_omits_absent_url() {
        let response = QuizResponse {
            essential_result: "a".into(),
            logic: "b".into(),
            news_connection: "c".into(),
            suggested_article_url: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["essentialResult"], "a");
        assert_eq!(json["newsConnection"], "c");
        assert!(json.get("suggestedArticleUrl").is_none());
    }
}
