//! Speech collaborators: transcription of spoken answers and synthesis of spoken questions.
//!
//! Both are stateless per-call services. `AppState` and the interviewer hold them as
//! `Arc<dyn SpeechToText>` / `Arc<dyn TextToSpeech>` so tests can swap in fakes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod deepgram;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response did not contain a transcript")]
    MissingTranscript,

    #[error("synthesized audio was empty")]
    EmptyAudio,
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribes raw audio bytes of the declared MIME type.
    async fn transcribe(&self, audio: Bytes, mime_type: &str) -> Result<String, SpeechError>;
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Renders `text` as spoken audio (MP3).
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError>;
}
