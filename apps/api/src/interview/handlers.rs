//! Axum route handlers for the Interview API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::extract::FeedbackRecord;
use crate::interview::interviewer::NextQuestion;
use crate::interview::session::{Phase, SessionStatus};
use crate::resume_text::PdfError;
use crate::state::AppState;

/// What the browser recorder produces when the part carries no content type.
const DEFAULT_AUDIO_MIME: &str = "audio/wav";
/// Multipart part name carrying the upload, for both résumé and audio.
const FILE_PART: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub message: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NextQuestionResponse {
    Completed {
        message: String,
        completed: bool,
    },
    Question {
        question: String,
        /// Base64-encoded MP3.
        audio: String,
        question_number: usize,
        total_questions: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub transcript: String,
}

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /upload-resume/
///
/// Extracts text from an uploaded PDF résumé and starts a new interview with it.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let upload = read_file_part(multipart).await?;
    info!("Received resume upload request: {:?}", upload.file_name);

    let is_pdf = upload
        .file_name
        .as_deref()
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
    if !is_pdf {
        return Err(AppError::Validation("Only PDF files are supported".to_string()));
    }
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Empty file received".to_string()));
    }

    let text = state
        .resume_text
        .extract_text(upload.bytes)
        .await
        .map_err(|e| match e {
            PdfError::Timeout(_) => AppError::Upstream(format!("Error reading PDF: {e}")),
            _ => {
                warn!("Error reading PDF: {e}");
                AppError::Validation("Invalid PDF file".to_string())
            }
        })?;

    if text.trim().is_empty() {
        return Err(AppError::Validation("No text content found in PDF".to_string()));
    }

    let question = state.interviewer.start_session(&text).await?;

    Ok(Json(UploadResumeResponse {
        message: "Resume processed successfully".to_string(),
        question,
    }))
}

/// GET /next-question/
///
/// Returns the current question with base64 audio, or `{completed: true}` once all turns are done.
pub async fn handle_next_question(
    State(state): State<AppState>,
) -> Result<Json<NextQuestionResponse>, AppError> {
    let response = match state.interviewer.next_question().await? {
        NextQuestion::Completed => NextQuestionResponse::Completed {
            message: "Interview completed".to_string(),
            completed: true,
        },
        NextQuestion::Pending(pending) => NextQuestionResponse::Question {
            question: pending.question,
            audio: BASE64.encode(&pending.audio),
            question_number: pending.question_number,
            total_questions: pending.total_questions,
        },
    };
    Ok(Json(response))
}

/// POST /transcribe/
///
/// Transcribes a spoken answer and records it against the current question.
pub async fn handle_transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, AppError> {
    let upload = read_file_part(multipart).await?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Empty audio file received".to_string()));
    }

    // submit_answer re-checks under the turn lock.
    match state.interviewer.status().await.phase {
        Phase::Empty => {
            return Err(AppError::State(
                "No interview in progress. Please upload a resume first.".to_string(),
            ))
        }
        Phase::Completed => {
            return Err(AppError::State("Interview already completed.".to_string()))
        }
        Phase::InProgress { .. } => {}
    }

    let mime_type = upload.content_type.as_deref().unwrap_or(DEFAULT_AUDIO_MIME);
    let transcript = state
        .speech_to_text
        .transcribe(upload.bytes, mime_type)
        .await
        .map_err(|e| AppError::Upstream(format!("Error transcribing audio: {e}")))?;

    state.interviewer.submit_answer(transcript.clone()).await?;

    Ok(Json(TranscribeResponse { transcript }))
}

/// GET /generate-feedback/
pub async fn handle_generate_feedback(
    State(state): State<AppState>,
) -> Result<Json<FeedbackRecord>, AppError> {
    Ok(Json(state.interviewer.generate_feedback().await?))
}

/// GET /session/
pub async fn handle_session_status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.interviewer.status().await)
}

/// Reads the `file` part of a multipart upload.
async fn read_file_part(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadedFile, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_PART) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation("No file provided".to_string()))
}
