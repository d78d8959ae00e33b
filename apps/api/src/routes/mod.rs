pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/upload-resume/", post(handlers::handle_upload_resume))
        .route("/next-question/", get(handlers::handle_next_question))
        .route("/transcribe/", post(handlers::handle_transcribe))
        .route("/generate-feedback/", get(handlers::handle_generate_feedback))
        .route("/session/", get(handlers::handle_session_status))
        .with_state(state)
}
