//! Response extraction. Turns free-form model completions into a question or a feedback record.
//!
//! Question extraction is a chain of best-effort parsers tried in priority order; each one
//! either matches or passes, and the last one always matches. Feedback extraction is strict:
//! anything short of a complete record is a `ParseError`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

static QUOTED_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+\?)""#).expect("quoted question pattern is valid"));

static BARE_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^.!?]+\?)").expect("bare question pattern is valid"));

const REQUIRED_FEEDBACK_FIELDS: [&str; 4] = [
    "score",
    "technical_feedback",
    "communication_feedback",
    "improvements",
];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Could not find JSON object in response")]
    NoObject,

    #[error("Error parsing feedback: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Missing required key in feedback response: {0}")]
    MissingField(&'static str),

    #[error("Invalid feedback format: {0}")]
    InvalidField(#[source] serde_json::Error),

    #[error("Score {0} is outside 0-100")]
    ScoreOutOfRange(Number),
}

/// Scored evaluation of a finished (or partially finished) interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// 0 – 100, kept exactly as the model wrote it (integer or decimal).
    pub score: Number,
    pub technical_feedback: String,
    pub communication_feedback: String,
    pub improvements: String,
}

type QuestionParser = fn(&str) -> Option<String>;

/// Priority order: structured object, quoted question, bare question, whole text.
const QUESTION_PARSERS: [QuestionParser; 4] = [
    question_from_json,
    quoted_question,
    bare_question,
    whole_text,
];

/// Extracts a single interview question from model output.
/// The result always ends with `?`.
pub fn extract_question(text: &str) -> String {
    let mut question = QUESTION_PARSERS
        .iter()
        .find_map(|parse| parse(text))
        .unwrap_or_default();

    if !question.ends_with('?') {
        question.push('?');
    }
    question
}

fn question_from_json(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    value.get("question")?.as_str().map(String::from)
}

fn quoted_question(text: &str) -> Option<String> {
    QUOTED_QUESTION
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn bare_question(text: &str) -> Option<String> {
    BARE_QUESTION
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

fn whole_text(text: &str) -> Option<String> {
    Some(text.trim().to_string())
}

/// Extracts the feedback object spanning the first `{` to the last `}`, ignoring surrounding prose.
pub fn extract_feedback(text: &str) -> Result<FeedbackRecord, ParseError> {
    let start = text.find('{').ok_or(ParseError::NoObject)?;
    let end = text.rfind('}').ok_or(ParseError::NoObject)?;
    if end < start {
        return Err(ParseError::NoObject);
    }

    let value: Value = serde_json::from_str(&text[start..=end]).map_err(ParseError::Malformed)?;

    for field in REQUIRED_FEEDBACK_FIELDS {
        if value.get(field).is_none() {
            return Err(ParseError::MissingField(field));
        }
    }

    let record: FeedbackRecord = serde_json::from_value(value).map_err(ParseError::InvalidField)?;

    let in_range = record
        .score
        .as_f64()
        .is_some_and(|s| (0.0..=100.0).contains(&s));
    if !in_range {
        return Err(ParseError::ScoreOutOfRange(record.score));
    }

    Ok(record)
}
