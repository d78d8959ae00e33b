//! Interview session state.
//!
//! One `Session` holds one interview: the résumé, the questions asked, the answers given and
//! the progress counter. `SessionStore` owns the current session with a create-or-replace
//! lifecycle and serializes the operations that mutate it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Number of question/answer turns in every interview.
pub const TOTAL_QUESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Interviewer,
    /// Transcribed answers.
    Candidate,
}

/// One entry of the conversation history used as model context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum Phase {
    Empty,
    /// `turn` is the zero-based index of the question awaiting an answer.
    InProgress { turn: usize },
    Completed,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    resume_text: String,
    questions: Vec<String>,
    answers: Vec<String>,
    current_index: usize,
    history: Vec<Turn>,
}

impl Session {
    pub fn new(resume_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            resume_text: resume_text.into(),
            questions: Vec::new(),
            answers: Vec::new(),
            current_index: 0,
            history: Vec::new(),
        }
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn phase(&self) -> Phase {
        if self.is_completed() {
            Phase::Completed
        } else {
            Phase::InProgress {
                turn: self.current_index,
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= TOTAL_QUESTIONS
    }

    /// True when the current turn is not the last one, so answering it calls for a follow-up.
    pub fn needs_follow_up(&self) -> bool {
        self.current_index + 1 < TOTAL_QUESTIONS
    }

    /// The question for the current turn, if it was generated.
    pub fn current_question(&self) -> Option<&str> {
        if self.is_completed() {
            return None;
        }
        self.questions.get(self.current_index).map(String::as_str)
    }

    /// Question/answer pairs answered so far, in order.
    pub fn transcript(&self) -> impl Iterator<Item = (&str, &str)> {
        self.questions
            .iter()
            .zip(&self.answers)
            .map(|(q, a)| (q.as_str(), a.as_str()))
    }

    pub fn record_question(&mut self, question: String) {
        self.history.push(Turn {
            role: Role::Interviewer,
            content: question.clone(),
        });
        self.questions.push(question);
    }

    pub fn record_answer(&mut self, answer: String) {
        self.history.push(Turn {
            role: Role::Candidate,
            content: answer.clone(),
        });
        self.answers.push(answer);
    }

    /// Moves to the next turn. Clamped at `TOTAL_QUESTIONS`.
    pub fn advance(&mut self) {
        self.current_index = (self.current_index + 1).min(TOTAL_QUESTIONS);
    }
}

/// Read-only progress snapshot served by `GET /session/`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    #[serde(flatten)]
    pub phase: Phase,
    pub session_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub question_number: Option<usize>,
    pub questions_asked: usize,
    pub answers_recorded: usize,
    pub total_questions: usize,
}

impl SessionStatus {
    pub fn of(session: Option<&Session>) -> Self {
        match session {
            None => Self {
                phase: Phase::Empty,
                session_id: None,
                started_at: None,
                question_number: None,
                questions_asked: 0,
                answers_recorded: 0,
                total_questions: TOTAL_QUESTIONS,
            },
            Some(s) => Self {
                phase: s.phase(),
                session_id: Some(s.id),
                started_at: Some(s.started_at),
                question_number: (!s.is_completed()).then_some(s.current_index + 1),
                questions_asked: s.questions().len(),
                answers_recorded: s.answers().len(),
                total_questions: TOTAL_QUESTIONS,
            },
        }
    }
}

/// Holder of the current session.
///
/// `turn_lock` serializes start / answer / feedback against each other for their whole
/// duration, remote calls included. `current` is only locked for short reads and commits,
/// never across a remote call.
#[derive(Default)]
pub struct SessionStore {
    turn_lock: Mutex<()>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn exclusive_turn(&self) -> MutexGuard<'_, ()> {
        self.turn_lock.lock().await
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().await
    }

    /// Replaces the current session wholesale. Nothing of the previous one survives.
    pub async fn replace(&self, session: Session) {
        *self.current.write().await = Some(session);
    }

    pub async fn status(&self) -> SessionStatus {
        SessionStatus::of(self.read().await.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_questions(n: usize) -> Session {
        let mut session = Session::new("Rust engineer, 5 years");
        for i in 0..n {
            session.record_question(format!("Question {i}?"));
        }
        session
    }

    #[test]
    fn test_new_session_is_at_first_turn() {
        let session = Session::new("resume");
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), Phase::InProgress { turn: 0 });
        assert!(session.questions().is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_record_question_and_answer_interleave_history() {
        let mut session = session_with_questions(1);
        session.record_answer("A mutex guards shared data.".to_string());

        assert_eq!(
            session.history(),
            &[
                Turn {
                    role: Role::Interviewer,
                    content: "Question 0?".to_string()
                },
                Turn {
                    role: Role::Candidate,
                    content: "A mutex guards shared data.".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_advance_is_clamped() {
        let mut session = session_with_questions(TOTAL_QUESTIONS);
        for _ in 0..TOTAL_QUESTIONS + 2 {
            session.advance();
        }
        assert_eq!(session.current_index(), TOTAL_QUESTIONS);
        assert_eq!(session.phase(), Phase::Completed);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_needs_follow_up_until_last_turn() {
        let mut session = session_with_questions(TOTAL_QUESTIONS);
        let mut follow_ups = Vec::new();
        while !session.is_completed() {
            follow_ups.push(session.needs_follow_up());
            session.advance();
        }
        assert_eq!(follow_ups, vec![true, true, false]);
    }

    #[test]
    fn test_current_question_missing_after_failed_follow_up() {
        let mut session = session_with_questions(1);
        session.record_answer("answer".to_string());
        session.advance();
        assert!(session.current_question().is_none());
        assert_eq!(session.phase(), Phase::InProgress { turn: 1 });
    }

    #[test]
    fn test_transcript_pairs_only_answered_questions() {
        let mut session = session_with_questions(2);
        session.record_answer("first".to_string());
        let pairs: Vec<_> = session.transcript().collect();
        assert_eq!(pairs, vec![("Question 0?", "first")]);
    }

    #[test]
    fn test_status_of_empty_store() {
        let status = SessionStatus::of(None);
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["phase"], "empty");
        assert_eq!(value["total_questions"], TOTAL_QUESTIONS);
        assert!(value["session_id"].is_null());
    }

    #[test]
    fn test_status_in_progress_serializes_turn() {
        let session = session_with_questions(1);
        let value = serde_json::to_value(SessionStatus::of(Some(&session))).unwrap();
        assert_eq!(value["phase"], "in_progress");
        assert_eq!(value["turn"], 0);
        assert_eq!(value["question_number"], 1);
        assert_eq!(value["questions_asked"], 1);
    }

    #[tokio::test]
    async fn test_replace_discards_previous_session() {
        let store = SessionStore::new();
        let mut first = session_with_questions(2);
        first.record_answer("old answer".to_string());
        first.advance();
        store.replace(first).await;

        let second = Session::new("another resume");
        let second_id = second.id;
        store.replace(second).await;

        let guard = store.read().await;
        let current = guard.as_ref().unwrap();
        assert_eq!(current.id, second_id);
        assert_eq!(current.resume_text(), "another resume");
        assert!(current.questions().is_empty());
        assert!(current.answers().is_empty());
        assert!(current.history().is_empty());
        assert_eq!(current.current_index(), 0);
    }
}
