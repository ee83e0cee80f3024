//! Axum route handlers for stateless segmenting.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::answers::AnswerStore;
use crate::config::Config;
use crate::errors::AppError;
use crate::segmenter::{bind, segment, Block, ProfileKind, Question, RuleProfile, SegmentedTest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SegmentRequest {
    pub markdown: String,
    #[serde(default)]
    pub profile: ProfileKind,
    #[serde(default)]
    pub answers: AnswerStore,
}

#[derive(Debug, Serialize)]
pub struct SegmentResponse {
    pub profile: ProfileKind,
    pub questions: Vec<Question>,
    pub blocks: Vec<Block>,
}

/// Rejects blank documents and documents over the configured size.
pub fn check_document(markdown: &str, config: &Config) -> Result<(), AppError> {
    if markdown.trim().is_empty() {
        return Err(AppError::Validation("markdown cannot be empty".to_string()));
    }
    if markdown.len() > config.max_document_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "document is {} bytes, limit is {}",
            markdown.len(),
            config.max_document_bytes
        )));
    }
    Ok(())
}

/// Runs the CPU-bound segmenting pass off the async executor.
///
/// Takes owned input for the `'static` closure bound.
pub async fn segment_blocking(
    markdown: String,
    profile: ProfileKind,
) -> Result<SegmentedTest, AppError> {
    tokio::task::spawn_blocking(move || segment(&markdown, &RuleProfile::for_kind(profile)))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in segmenter: {e}")))
}

/// POST /api/v1/segment
///
/// Segments a test document with the requested profile and binds any
/// answers supplied alongside it.
pub async fn handle_segment(
    State(state): State<AppState>,
    Json(request): Json<SegmentRequest>,
) -> Result<Json<SegmentResponse>, AppError> {
    check_document(&request.markdown, &state.config)?;

    let segmented = segment_blocking(request.markdown, request.profile).await?;
    let blocks = bind(&segmented.blocks, &request.answers, request.profile);

    Ok(Json(SegmentResponse {
        profile: request.profile,
        questions: segmented.questions,
        blocks,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_document_rejects_blank() {
        let err = check_document("  \n", &Config::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_check_document_rejects_oversized() {
        let config = Config {
            max_document_bytes: 8,
            ..Config::default()
        };
        let err = check_document("# Prueba larga", &config).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert!(check_document("# Corta", &config).is_ok());
    }

    #[test]
    fn test_request_defaults_to_candidate_without_answers() {
        let request: SegmentRequest = serde_json::from_str(r##"{"markdown":"# T"}"##).unwrap();
        assert_eq!(request.profile, ProfileKind::Candidate);
        assert!(request.answers.is_empty());
    }

    #[tokio::test]
    async fn test_segment_blocking_matches_inline_pass() {
        let doc = "## Parte 1\n1. ¿Qué es un trait object?\nA) Un tipo\nB) Un valor\n";
        let segmented = segment_blocking(doc.to_string(), ProfileKind::Reviewer)
            .await
            .unwrap();
        assert_eq!(segmented, segment(doc, &RuleProfile::reviewer()));
        assert_eq!(segmented.questions[0].options.len(), 2);
    }
}
