//! Interview orchestration. Decides what happens next and assembles model context.
//!
//! Flow: start_session → (next_question → submit_answer) × TOTAL_QUESTIONS → generate_feedback.
//!
//! Question i+1 is generated when answer i is submitted; `next_question` only reads and
//! voices what is already there. An answer is committed before its follow-up is requested and
//! is never rolled back if that request fails.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::extract::{extract_feedback, extract_question, FeedbackRecord};
use crate::interview::prompts::{
    render, FEEDBACK_MAX_TOKENS, FEEDBACK_PROMPT, FEEDBACK_SYSTEM, FIRST_QUESTION_PROMPT,
    FIRST_QUESTION_SYSTEM, FOLLOW_UP_PROMPT, FOLLOW_UP_SYSTEM, QUESTION_MAX_TOKENS,
};
use crate::interview::session::{Role, Session, SessionStatus, SessionStore, TOTAL_QUESTIONS};
use crate::llm_client::prompts::{
    INTERVIEWER_PERSONA, JSON_ONLY_INSTRUCTION, SINGLE_QUESTION_INSTRUCTION,
};
use crate::llm_client::LanguageModel;
use crate::speech::TextToSpeech;

const NO_SESSION: &str = "No questions available. Please upload a resume first.";

/// Outcome of asking for the current question.
#[derive(Debug)]
pub enum NextQuestion {
    /// All turns are answered; nothing further will be asked.
    Completed,
    Pending(PendingQuestion),
}

#[derive(Debug)]
pub struct PendingQuestion {
    pub question: String,
    /// Spoken rendering of `question` (MP3).
    pub audio: Bytes,
    /// 1-based position.
    pub question_number: usize,
    pub total_questions: usize,
}

/// Owns the interview session and the collaborators needed to advance it.
pub struct Interviewer {
    llm: Arc<dyn LanguageModel>,
    tts: Arc<dyn TextToSpeech>,
    store: SessionStore,
}

impl Interviewer {
    pub fn new(llm: Arc<dyn LanguageModel>, tts: Arc<dyn TextToSpeech>) -> Self {
        Self {
            llm,
            tts,
            store: SessionStore::new(),
        }
    }

    pub async fn status(&self) -> SessionStatus {
        self.store.status().await
    }

    /// Starts a new interview from résumé text and returns its first question.
    ///
    /// The new session is committed only once the first question exists, replacing
    /// whatever session came before. A failed start leaves the previous session as it was.
    pub async fn start_session(&self, resume_text: &str) -> Result<String, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::Validation("No text content found in resume".to_string()));
        }

        let _turn = self.store.exclusive_turn().await;

        let mut session = Session::new(resume_text);
        let prompt = render(
            FIRST_QUESTION_PROMPT,
            &[
                ("resume", resume_text),
                ("format_instruction", SINGLE_QUESTION_INSTRUCTION),
            ],
        );

        info!("Generating first question for session {}", session.id);
        let question = self.ask_question(FIRST_QUESTION_SYSTEM, &prompt).await?;

        session.record_question(question.clone());
        let session_id = session.id;
        self.store.replace(session).await;

        info!("Session {session_id} started with first question: {question}");
        Ok(question)
    }

    /// Returns the current question with its spoken rendering, or the completion signal.
    pub async fn next_question(&self) -> Result<NextQuestion, AppError> {
        let (question, question_number) = {
            let guard = self.store.read().await;
            let session = guard
                .as_ref()
                .ok_or_else(|| AppError::State(NO_SESSION.to_string()))?;

            if session.is_completed() {
                return Ok(NextQuestion::Completed);
            }

            let question = session.current_question().ok_or_else(|| {
                AppError::State(format!(
                    "Question {} was not generated. Please upload a resume to start over.",
                    session.current_index() + 1
                ))
            })?;
            (question.to_string(), session.current_index() + 1)
        };

        let audio = self.tts.synthesize(&question).await.map_err(|e| {
            AppError::Upstream(format!("Error generating audio for question: {e}"))
        })?;

        Ok(NextQuestion::Pending(PendingQuestion {
            question,
            audio,
            question_number,
            total_questions: TOTAL_QUESTIONS,
        }))
    }

    /// Records an answer to the current question and moves to the next turn.
    ///
    /// Before the last turn this also generates the follow-up question. If that fails the
    /// answer stays recorded and the turn still advances; the error is returned afterwards.
    // TODO: product review of partial failure. A failed follow-up leaves the next turn without
    // a question, and the only way forward is a new résumé upload.
    pub async fn submit_answer(&self, transcript: String) -> Result<usize, AppError> {
        let _turn = self.store.exclusive_turn().await;

        let (session_id, follow_up_prompt) = {
            let mut guard = self.store.write().await;
            let session = guard
                .as_mut()
                .ok_or_else(|| AppError::State(NO_SESSION.to_string()))?;

            if session.is_completed() {
                return Err(AppError::State(
                    "Interview already completed. Request feedback or upload a new resume."
                        .to_string(),
                ));
            }
            if session.current_question().is_none() {
                return Err(AppError::State(format!(
                    "Question {} was not generated. Please upload a resume to start over.",
                    session.current_index() + 1
                )));
            }

            session.record_answer(transcript);
            let session = &*session;
            let prompt = session
                .needs_follow_up()
                .then(|| build_follow_up_prompt(session));
            (session.id, prompt)
        };

        let follow_up = match follow_up_prompt {
            Some(prompt) => self
                .ask_question(FOLLOW_UP_SYSTEM, &prompt)
                .await
                .map(Some),
            None => Ok(None),
        };

        let mut guard = self.store.write().await;
        let session = guard.as_mut().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "session {session_id} disappeared while answering"
            ))
        })?;

        let outcome = match follow_up {
            Ok(Some(question)) => {
                info!("Session {session_id}: generated next question: {question}");
                session.record_question(question);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(
                    "Session {session_id}: answer {} recorded but follow-up generation failed",
                    session.answers().len()
                );
                Err(e)
            }
        };

        session.advance();
        if session.is_completed() {
            info!("Session {session_id}: interview completed");
        }

        outcome.map(|()| session.current_index())
    }

    /// Asks the model for a scored evaluation of every answered question.
    pub async fn generate_feedback(&self) -> Result<FeedbackRecord, AppError> {
        let _turn = self.store.exclusive_turn().await;

        let (session_id, prompt) = {
            let guard = self.store.read().await;
            let session = guard
                .as_ref()
                .filter(|s| !s.answers().is_empty())
                .ok_or_else(|| {
                    AppError::Validation("No interview answers to evaluate".to_string())
                })?;
            (session.id, build_feedback_prompt(session))
        };

        info!("Session {session_id}: generating feedback");
        let system = format!("{INTERVIEWER_PERSONA} {FEEDBACK_SYSTEM} {JSON_ONLY_INSTRUCTION}");
        let text = self
            .llm
            .complete(&system, &prompt, FEEDBACK_MAX_TOKENS)
            .await
            .map_err(|e| AppError::Upstream(format!("Error generating feedback: {e}")))?;

        extract_feedback(&text)
            .map_err(|e| AppError::Upstream(format!("Error generating feedback: {e}")))
    }

    async fn ask_question(&self, system: &str, prompt: &str) -> Result<String, AppError> {
        let system = format!("{INTERVIEWER_PERSONA} {system}");
        let text = self
            .llm
            .complete(&system, prompt, QUESTION_MAX_TOKENS)
            .await
            .map_err(|e| AppError::Upstream(format!("Error generating question: {e}")))?;
        Ok(extract_question(&text))
    }
}

/// Résumé plus the interleaved history so far.
fn build_follow_up_prompt(session: &Session) -> String {
    let conversation = session
        .history()
        .iter()
        .map(|turn| match turn.role {
            Role::Interviewer => format!("Q: {}", turn.content),
            Role::Candidate => format!("A: {}", turn.content),
        })
        .collect::<Vec<_>>()
        .join("\n");

    render(
        FOLLOW_UP_PROMPT,
        &[
            ("resume", session.resume_text()),
            ("conversation", conversation.as_str()),
            ("format_instruction", SINGLE_QUESTION_INSTRUCTION),
        ],
    )
}

/// Résumé plus every answered question/answer pair.
fn build_feedback_prompt(session: &Session) -> String {
    let interview = session
        .transcript()
        .map(|(q, a)| format!("Q: {q}\nA: {a}"))
        .collect::<Vec<_>>()
        .join("\n");

    render(
        FEEDBACK_PROMPT,
        &[("resume", session.resume_text()), ("interview", interview.as_str())],
    )
}
