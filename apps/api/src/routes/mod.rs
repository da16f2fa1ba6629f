pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as evaluation_handlers;
use crate::rubric::handlers as rubric_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Conversation analysis API
        .route(
            "/api/analyze-conversation",
            post(evaluation_handlers::handle_analyze),
        )
        .route(
            "/api/cleanup-conversation",
            post(evaluation_handlers::handle_cleanup),
        )
        .route(
            "/api/check-job-status",
            post(evaluation_handlers::handle_check_job_status),
        )
        // Stored evaluations
        .route(
            "/api/evaluations",
            get(evaluation_handlers::handle_list_evaluations),
        )
        .route(
            "/api/evaluations/:id",
            get(evaluation_handlers::handle_get_evaluation),
        )
        // Rubric API
        .route(
            "/api/rubrics",
            get(rubric_handlers::handle_list).post(rubric_handlers::handle_create),
        )
        .route(
            "/api/rubrics/:id",
            get(rubric_handlers::handle_get)
                .put(rubric_handlers::handle_update)
                .delete(rubric_handlers::handle_delete),
        )
        .route(
            "/api/rubrics/:id/set-default",
            post(rubric_handlers::handle_set_default),
        )
        .with_state(state)
}
