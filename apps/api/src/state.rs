use std::sync::Arc;

use crate::interview::interviewer::Interviewer;
use crate::resume_text::ResumeTextExtractor;
use crate::speech::SpeechToText;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the one interview session and the LLM / TTS collaborators that advance it.
    pub interviewer: Arc<Interviewer>,
    pub speech_to_text: Arc<dyn SpeechToText>,
    pub resume_text: Arc<dyn ResumeTextExtractor>,
}
