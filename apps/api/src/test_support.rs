//! Scripted collaborator fakes shared by unit and handler tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::llm_client::{LanguageModel, LlmError};
use crate::resume_text::{PdfError, ResumeTextExtractor};
use crate::speech::{SpeechError, SpeechToText, TextToSpeech};

/// Replies with queued completions in order and records every (system, prompt) it receives.
/// An exhausted script fails like an unavailable upstream.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<(String, String)>>,
    latency: Option<Duration>,
}

impl ScriptedModel {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let model = Self::default();
        for reply in replies {
            model.push_reply(reply);
        }
        model
    }

    /// Sleeps for `latency` before each reply, yielding to other tasks mid-call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Some(reply.into()));
    }

    /// Queues a failure ahead of any remaining replies.
    pub fn push_failure(&self) {
        self.replies.lock().unwrap().push_front(None);
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.replies.lock().unwrap().pop_front() {
            Some(Some(reply)) => Ok(reply),
            _ => Err(LlmError::Api {
                status: 503,
                message: "model unavailable".to_string(),
            }),
        }
    }
}

/// Deterministic speech: synthesis echoes the text as bytes, transcription returns a fixed answer.
pub struct FakeSpeech {
    transcript: String,
    fail: bool,
}

impl Default for FakeSpeech {
    fn default() -> Self {
        Self::transcribing("I would shard the cache by key hash.")
    }
}

impl FakeSpeech {
    pub fn transcribing(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: String::new(),
            fail: true,
        }
    }

    pub fn audio_for(text: &str) -> Bytes {
        Bytes::from(format!("mp3:{text}"))
    }

    fn unavailable() -> SpeechError {
        SpeechError::Api {
            status: 503,
            message: "speech service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl SpeechToText for FakeSpeech {
    async fn transcribe(&self, _audio: Bytes, _mime_type: &str) -> Result<String, SpeechError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(self.transcript.clone())
    }
}

#[async_trait]
impl TextToSpeech for FakeSpeech {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(Self::audio_for(text))
    }
}

/// Treats the uploaded bytes as UTF-8 text. Bytes starting with `%BROKEN` are unreadable and
/// bytes starting with `%STALL` time out.
pub struct PlainTextPdf;

#[async_trait]
impl ResumeTextExtractor for PlainTextPdf {
    async fn extract_text(&self, pdf: Bytes) -> Result<String, PdfError> {
        if pdf.starts_with(b"%STALL") {
            return Err(PdfError::Timeout(Duration::from_secs(60)));
        }
        if pdf.starts_with(b"%BROKEN") {
            return Err(PdfError::Unreadable("xref table not found".to_string()));
        }
        Ok(String::from_utf8_lossy(&pdf).into_owned())
    }
}
