// Interview engine: session state, response extraction, prompts, orchestration, handlers.
// All LLM calls go through llm_client; all speech goes through speech.

pub mod extract;
pub mod handlers;
pub mod interviewer;
pub mod prompts;
pub mod session;
