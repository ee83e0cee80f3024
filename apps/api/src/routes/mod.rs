pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::answers::handlers as answer_handlers;
use crate::segmenter::handlers as segment_handlers;
use crate::state::AppState;
use crate::technical_tests::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless segmenting and codec
        .route("/api/v1/segment", post(segment_handlers::handle_segment))
        .route(
            "/api/v1/answers/serialize",
            post(answer_handlers::handle_serialize),
        )
        .route("/api/v1/answers/parse", post(answer_handlers::handle_parse))
        // Technical-test lifecycle
        .route(
            "/api/v1/technical-tests",
            get(handlers::handle_list_tests).post(handlers::handle_create_test),
        )
        .route("/api/v1/technical-tests/:id", get(handlers::handle_get_test))
        .route(
            "/api/v1/technical-tests/:id/render",
            get(handlers::handle_render_test),
        )
        .route(
            "/api/v1/technical-tests/:id/answers",
            get(handlers::handle_get_submitted_answers),
        )
        .route(
            "/api/v1/technical-tests/:id/answers/:question_id",
            put(handlers::handle_set_answer),
        )
        .route(
            "/api/v1/technical-tests/:id/submit",
            post(handlers::handle_submit_test),
        )
        .route(
            "/api/v1/technical-tests/:id/review",
            post(handlers::handle_review_test),
        )
        .with_state(state)
}
