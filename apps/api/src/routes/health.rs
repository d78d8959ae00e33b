use axum::Json;
use serde_json::{json, Value};

use crate::interview::session::TOTAL_QUESTIONS;
use crate::llm_client::MODEL;
use crate::speech::deepgram::VOICE_MODEL;

/// GET / and GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "interview-api",
        "version": env!("CARGO_PKG_VERSION"),
        "model": MODEL,
        "voice": VOICE_MODEL,
        "total_questions": TOTAL_QUESTIONS,
    }))
}
