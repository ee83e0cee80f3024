//! Axum route handlers for the technical-test lifecycle.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::answers::helpers::{
    format_time_remaining, progress_percent, sanitize_input, validate_answer,
};
use crate::answers::{parse_submission, parse_submitted_answers, Submission};
use crate::errors::AppError;
use crate::models::technical_test::{TechnicalTest, TestStatus};
use crate::segmenter::handlers::{check_document, segment_blocking};
use crate::segmenter::{bind, Block, ProfileKind, Question, QuestionKind};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTestRequest {
    pub candidate_name: Option<String>,
    pub test_markdown: String,
}

#[derive(Debug, Serialize)]
pub struct TestSummary {
    pub id: Uuid,
    pub candidate_name: Option<String>,
    pub status: TestStatus,
    pub answered: usize,
    pub score: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<&TechnicalTest> for TestSummary {
    fn from(test: &TechnicalTest) -> Self {
        TestSummary {
            id: test.id,
            candidate_name: test.candidate_name.clone(),
            status: test.status,
            answered: test.answers.answered_count(),
            score: test.score,
            created_at: test.created_at,
            submitted_at: test.submitted_at,
            reviewed_at: test.reviewed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenderQuery {
    #[serde(default)]
    pub view: ProfileKind,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub test_id: Uuid,
    pub status: TestStatus,
    pub view: ProfileKind,
    pub questions: Vec<Question>,
    pub blocks: Vec<Block>,
    pub answered: usize,
    pub progress_percent: u32,
    /// Question ids whose current answer does not satisfy the question.
    pub incomplete: Vec<String>,
    /// Countdown for the candidate while the test is still open.
    pub time_remaining: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetAnswerRequest {
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub score: i64,
    pub feedback: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/technical-tests
pub async fn handle_create_test(
    State(state): State<AppState>,
    Json(request): Json<CreateTestRequest>,
) -> Result<(StatusCode, Json<TechnicalTest>), AppError> {
    check_document(&request.test_markdown, &state.config)?;

    let candidate_name = request.candidate_name.as_deref().map(sanitize_input);
    let test = state
        .tests
        .insert(TechnicalTest::new(request.test_markdown, candidate_name))
        .await?;

    info!(test_id = %test.id, "Technical test sent");
    Ok((StatusCode::CREATED, Json(test)))
}

/// GET /api/v1/technical-tests
pub async fn handle_list_tests(
    State(state): State<AppState>,
) -> Result<Json<Vec<TestSummary>>, AppError> {
    let tests = state.tests.list().await?;
    Ok(Json(tests.iter().map(TestSummary::from).collect()))
}

/// GET /api/v1/technical-tests/:id
pub async fn handle_get_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TechnicalTest>, AppError> {
    Ok(Json(state.tests.get(id).await?))
}

/// GET /api/v1/technical-tests/:id/render?view=candidate|reviewer
///
/// Candidate view binds in-progress answers; reviewer view binds the
/// answers parsed back out of the submitted blob.
pub async fn handle_render_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RenderQuery>,
) -> Result<Json<RenderResponse>, AppError> {
    let test = state.tests.get(id).await?;
    let view = query.view;

    let answers = match view {
        ProfileKind::Candidate => test.answers.clone(),
        ProfileKind::Reviewer => parse_submitted_answers(test.candidate_response.as_deref()),
    };

    let segmented = segment_blocking(test.test_markdown.clone(), view).await?;
    let blocks = bind(&segmented.blocks, &answers, view);

    let incomplete: Vec<String> = segmented
        .questions
        .iter()
        .filter(|q| !validate_answer(q, answers.get(&q.id).unwrap_or_default()))
        .map(|q| q.id.clone())
        .collect();
    let answered = segmented.questions.len() - incomplete.len();

    let time_remaining = (view == ProfileKind::Candidate && test.status.accepts_answers())
        .then(|| {
            format_time_remaining(
                test.seconds_remaining(state.config.test_time_limit_secs, Utc::now()),
            )
        });

    Ok(Json(RenderResponse {
        test_id: test.id,
        status: test.status,
        view,
        progress_percent: progress_percent(segmented.questions.len(), answered),
        questions: segmented.questions,
        blocks,
        answered,
        incomplete,
        time_remaining,
    }))
}

/// PUT /api/v1/technical-tests/:id/answers/:question_id
///
/// Overwrites the answer for one question. A choice answer for a known
/// choice question must be one of its option values.
pub async fn handle_set_answer(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, String)>,
    Json(request): Json<SetAnswerRequest>,
) -> Result<StatusCode, AppError> {
    let test = state.tests.get(id).await?;
    let segmented = segment_blocking(test.test_markdown, ProfileKind::Candidate).await?;

    if let Some(question) = segmented.question(&question_id) {
        if question.kind == QuestionKind::SingleChoice && !validate_answer(question, &request.value)
        {
            return Err(AppError::Validation(format!(
                "'{}' is not an option of {question_id}",
                request.value
            )));
        }
    }

    let value = request.value;
    state
        .tests
        .update(
            id,
            Box::new(move |t: &mut TechnicalTest| t.set_answer(&question_id, value)),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/technical-tests/:id/submit
pub async fn handle_submit_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<TechnicalTest>, AppError> {
    let comments = request.comments;
    let test = state
        .tests
        .update(
            id,
            Box::new(move |t: &mut TechnicalTest| t.submit(comments.as_deref(), Utc::now())),
        )
        .await?;

    info!(
        test_id = %test.id,
        answered = test.answers.answered_count(),
        "Technical test submitted"
    );
    Ok(Json(test))
}

/// GET /api/v1/technical-tests/:id/answers
///
/// The submitted answers as the reviewer sees them. Empty before submit.
pub async fn handle_get_submitted_answers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, AppError> {
    let test = state.tests.get(id).await?;
    Ok(Json(
        test.candidate_response
            .as_deref()
            .map(parse_submission)
            .unwrap_or_default(),
    ))
}

/// POST /api/v1/technical-tests/:id/review
pub async fn handle_review_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<TechnicalTest>, AppError> {
    let score = request.score;
    let feedback = request.feedback.as_deref().map(sanitize_input);
    let test = state
        .tests
        .update(
            id,
            Box::new(move |t: &mut TechnicalTest| t.review(score, feedback, Utc::now())),
        )
        .await?;

    info!(test_id = %test.id, score = ?test.score, "Technical test reviewed");
    Ok(Json(test))
}
