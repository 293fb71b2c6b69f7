// Intake interview: a multi-turn conversation that collects the user's
// situation, then one extraction call that turns the transcript into IntakeData.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod session;
