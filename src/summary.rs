//! Lecture summary generation: one completion call, one formatted summary.
//!
//! Much simpler than the quiz pipeline — there is no article stage and no
//! inter-stage dependency, so this is a single validate-then-complete flow.

use crate::config::AppConfig;
use crate::error::StudyDeskError;
use crate::prompts;
use crate::providers::{CompletionRequest, TextCompletionProvider};
use tracing::info;

/// Summaries run cooler than quiz stages: the format is rigid and the
/// content should track the lecture, not improvise around it.
const SUMMARY_TEMPERATURE: f32 = 0.7;
const SUMMARY_MAX_TOKENS: u32 = 1000;

/// Generate a BIO-101-format lecture summary.
///
/// `student_inputs` is optional free text with other students'
/// contributions; when present it is woven into the prompt so the summary
/// can reference them.
pub async fn build_lecture_summary(
    lecture_content: &str,
    student_inputs: Option<&str>,
    completion: Option<&dyn TextCompletionProvider>,
    config: &AppConfig,
) -> Result<String, StudyDeskError> {
    let lecture = lecture_content.trim();
    if lecture.is_empty() {
        return Err(StudyDeskError::EmptyInput {
            hint: "Please add some lecture content first",
        });
    }

    // Configuration is checked after input validation: an empty form is the
    // student's fault, a missing key is ours.
    let completion =
        completion.ok_or(StudyDeskError::ProviderNotConfigured { provider: "Groq" })?;

    let summary = completion
        .complete(&CompletionRequest {
            system_prompt: prompts::SUMMARY_SYSTEM_PROMPT.to_string(),
            user_prompt: prompts::summary_prompt(lecture, student_inputs),
            model: config.generation_model.clone(),
            temperature: SUMMARY_TEMPERATURE,
            max_tokens: SUMMARY_MAX_TOKENS,
        })
        .await?;

    info!("lecture summary generated ({} bytes)", summary.len());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NeverCalled;

    #[async_trait]
    impl TextCompletionProvider for NeverCalled {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, StudyDeskError> {
            panic!("completion must not be called for empty input");
        }
    }

    #[tokio::test]
    async fn empty_lecture_content_rejected_before_any_call() {
        let config = AppConfig::default();
        let err = build_lecture_summary("   \n  ", None, Some(&NeverCalled), &config)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please add some lecture content first");
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn empty_input_outranks_missing_provider() {
        let config = AppConfig::default();
        let err = build_lecture_summary("", None, None, &config).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn missing_provider_is_a_configuration_error() {
        let config = AppConfig::default();
        let err = build_lecture_summary("mitosis lecture", None, None, &config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StudyDeskError::ProviderNotConfigured { .. }
        ));
        assert_eq!(err.status_code(), 500);
    }
}
