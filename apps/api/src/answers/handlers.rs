//! Axum route handlers for the answer blob codec.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::answers::{parse_submission, serialize_answers, AnswerStore, Submission};

#[derive(Debug, Deserialize)]
pub struct SerializeRequest {
    pub answers: AnswerStore,
    pub comments: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SerializeResponse {
    pub blob: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub blob: Option<String>,
}

/// POST /api/v1/answers/serialize
pub async fn handle_serialize(Json(request): Json<SerializeRequest>) -> Json<SerializeResponse> {
    Json(SerializeResponse {
        blob: serialize_answers(&request.answers, request.comments.as_deref()),
    })
}

/// POST /api/v1/answers/parse
///
/// Never fails on content; a missing or empty blob yields no answers.
pub async fn handle_parse(Json(request): Json<ParseRequest>) -> Json<Submission> {
    Json(
        request
            .blob
            .as_deref()
            .map(parse_submission)
            .unwrap_or_default(),
    )
}
