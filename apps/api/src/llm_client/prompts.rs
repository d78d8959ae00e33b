// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Persona shared by every interviewer system prompt.
pub const INTERVIEWER_PERSONA: &str = "You are an expert technical interviewer.";

/// Output-shape instruction appended to every question-generation prompt.
pub const SINGLE_QUESTION_INSTRUCTION: &str =
    "Respond with just the question, ending with a question mark.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Always respond with valid JSON.";
