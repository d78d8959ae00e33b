//! Deepgram client implementing both speech collaborators.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::speech::{SpeechError, SpeechToText, TextToSpeech};

const LISTEN_URL: &str = "https://api.deepgram.com/v1/listen";
const SPEAK_URL: &str = "https://api.deepgram.com/v1/speak";
/// English voice used for every spoken question.
pub const VOICE_MODEL: &str = "aura-asteria-en";

#[derive(Clone)]
pub struct DeepgramClient {
    client: Client,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
}

impl ListenResponse {
    fn into_transcript(self) -> Option<String> {
        self.results
            .channels
            .into_iter()
            .next()?
            .alternatives
            .into_iter()
            .next()
            .map(|a| a.transcript)
    }
}

#[derive(Debug, Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct DeepgramErrorBody {
    #[serde(alias = "err_msg", alias = "reason")]
    message: String,
}

impl DeepgramClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, SpeechError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            timeout,
        })
    }

    fn classify(&self, error: reqwest::Error) -> SpeechError {
        if error.is_timeout() {
            SpeechError::Timeout(self.timeout)
        } else {
            SpeechError::Http(error)
        }
    }

    async fn ensure_success(response: Response) -> Result<Response, SpeechError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<DeepgramErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(SpeechError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SpeechToText for DeepgramClient {
    async fn transcribe(&self, audio: Bytes, mime_type: &str) -> Result<String, SpeechError> {
        let response = self
            .client
            .post(LISTEN_URL)
            .query(&[("punctuate", "true")])
            .header("Authorization", format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, mime_type)
            .body(audio)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let response = Self::ensure_success(response).await?;
        let parsed: ListenResponse = response.json().await.map_err(|e| self.classify(e))?;
        let transcript = parsed
            .into_transcript()
            .ok_or(SpeechError::MissingTranscript)?;

        debug!("Transcribed {} characters", transcript.len());
        Ok(transcript)
    }
}

#[async_trait]
impl TextToSpeech for DeepgramClient {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError> {
        let response = self
            .client
            .post(SPEAK_URL)
            .query(&[("model", VOICE_MODEL)])
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&SpeakRequest { text })
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let response = Self::ensure_success(response).await?;
        let audio = response.bytes().await.map_err(|e| self.classify(e))?;
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(audio)
    }
}
