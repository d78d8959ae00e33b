// Interview LLM prompt templates.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Token budget for a single question. The model reasons in a `<think>` block first.
pub const QUESTION_MAX_TOKENS: u32 = 1024;
/// Token budget for the scored evaluation.
pub const FEEDBACK_MAX_TOKENS: u32 = 2048;

/// System prompt for the opening question. Prefix with `INTERVIEWER_PERSONA`.
pub const FIRST_QUESTION_SYSTEM: &str = "Generate relevant technical questions based on the \
    candidate's resume. Keep responses concise and focused.";

/// Opening question prompt. Placeholders: {resume}, {format_instruction}
pub const FIRST_QUESTION_PROMPT: &str = r#"Based on the following resume, generate a technical interview question:
Resume: {resume}

Generate a single technical question that assesses the candidate's most important skill from their resume.
The question should be specific and directly related to their experience.
{format_instruction}"#;

/// System prompt for follow-up questions. Prefix with `INTERVIEWER_PERSONA`.
pub const FOLLOW_UP_SYSTEM: &str = "Generate relevant follow-up questions based on the \
    conversation context. Keep responses concise and focused.";

/// Follow-up question prompt. Placeholders: {resume}, {conversation}, {format_instruction}
pub const FOLLOW_UP_PROMPT: &str = r#"Based on the following resume and previous conversation, generate the next technical interview question.

Resume: {resume}

Previous conversation:
{conversation}

Generate a single follow-up technical question that builds upon the candidate's previous answers.
The question should be specific and directly related to their responses.
{format_instruction}"#;

/// System prompt for evaluation. Prefix with `INTERVIEWER_PERSONA`, suffix with `JSON_ONLY_INSTRUCTION`.
pub const FEEDBACK_SYSTEM: &str = "You provide detailed feedback on candidate interviews.";

/// Evaluation prompt. Placeholders: {resume}, {interview}
pub const FEEDBACK_PROMPT: &str = r#"Based on the following interview conversation, provide a detailed evaluation:
Resume: {resume}

Interview:
{interview}

Provide an evaluation in JSON format with the following structure:
{
    "score": (number between 0-100),
    "technical_feedback": "detailed assessment of technical knowledge",
    "communication_feedback": "assessment of communication skills",
    "improvements": "specific areas for improvement"
}"#;

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so résumé text or answers that happen to contain
/// `{conversation}` or `{resume}` reach the model as written. Unknown braces are kept.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let placeholder = values
            .iter()
            .find(|&&(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));
        match placeholder {
            Some(&(name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
