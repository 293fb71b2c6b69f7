//! Intake session state machine.
//!
//! A session moves forward one user turn at a time. Each turn replays the whole
//! history through the model; when the model's reply contains the completion
//! phrase the session is closed and the transcript is distilled into
//! `IntakeData`. A closed session never reaches the model again.

use chrono::Utc;
use sqlx::types::Json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::prompts::{EXTRACTION_PROMPT, EXTRACTION_SYSTEM, INTAKE_SYSTEM};
use crate::llm_client::json::parse_json_reply;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{ChatRole, ChatTurn, LlmGateway};
use crate::models::intake::{ConversationMessage, IntakeData, IntakeSessionRow};
use crate::storage::IntakeStore;

/// Sent on the user's behalf to obtain the first question.
pub const OPENING_MESSAGE: &str = "Hi, I want to start planning my career transition.";
pub const RESUME_QUESTION: &str =
    "Let's continue where we left off. Could you tell me more about your current role?";
pub const ALREADY_COMPLETE_MESSAGE: &str =
    "This intake session is already complete. You can now generate your career plan!";
/// Matched case-insensitively against every model reply.
pub const COMPLETION_PHRASE: &str = "i have all the information i need";

const TURN_MAX_TOKENS: u32 = 1024;
const EXTRACTION_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session_id: Uuid,
    pub question: String,
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub question: String,
    pub is_complete: bool,
    pub current_step: i32,
}

/// Resumes the user's open session or opens a new one.
pub async fn start_session<S>(
    store: &S,
    llm: &dyn LlmGateway,
    user_id: Uuid,
) -> Result<StartedSession, AppError>
where
    S: IntakeStore + ?Sized,
{
    if let Some(existing) = store.find_open_session(user_id).await? {
        let question = match existing.conversation_history.last() {
            Some(last) if last.role == ChatRole::Assistant => last.content.clone(),
            _ => RESUME_QUESTION.to_string(),
        };
        info!("Resuming intake session {} for user {user_id}", existing.id);
        return Ok(StartedSession {
            session_id: existing.id,
            question,
        });
    }

    let question = llm
        .send(INTAKE_SYSTEM, &[ChatTurn::user(OPENING_MESSAGE)], TURN_MAX_TOKENS)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to open intake session: {e}")))?;

    let mut session = IntakeSessionRow::new(user_id);
    session.conversation_history = Json(vec![
        ConversationMessage::now(ChatRole::User, OPENING_MESSAGE),
        ConversationMessage::now(ChatRole::Assistant, question.clone()),
    ]);
    session.current_step = 1;
    store.insert_session(&session).await?;

    info!("Started intake session {} for user {user_id}", session.id);

    Ok(StartedSession {
        session_id: session.id,
        question,
    })
}

/// Appends one user answer and returns the model's next question.
pub async fn submit_message<S>(
    store: &S,
    llm: &dyn LlmGateway,
    session_id: Uuid,
    user_id: Uuid,
    message: &str,
) -> Result<TurnOutcome, AppError>
where
    S: IntakeStore + ?Sized,
{
    let mut session = store
        .find_session(session_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Intake session not found".to_string()))?;

    if session.is_complete {
        return Ok(TurnOutcome {
            question: ALREADY_COMPLETE_MESSAGE.to_string(),
            is_complete: true,
            current_step: session.current_step,
        });
    }

    let history = &mut session.conversation_history.0;
    history.push(ConversationMessage::now(ChatRole::User, message));

    let turns: Vec<ChatTurn> = history.iter().map(ConversationMessage::to_turn).collect();
    let reply = llm
        .send(INTAKE_SYSTEM, &turns, TURN_MAX_TOKENS)
        .await
        .map_err(|e| AppError::Llm(format!("Intake turn failed: {e}")))?;

    history.push(ConversationMessage::now(ChatRole::Assistant, reply.clone()));

    let is_complete = is_completion_reply(&reply);
    if is_complete {
        let data = extract_intake_data(llm, history).await?;
        session.collected_data = Json(data);
    }

    session.current_step += 1;
    session.is_complete = is_complete;
    session.updated_at = Utc::now();
    store.update_session(&session).await?;

    info!(
        "Processed intake message for session {session_id}: step={}, complete={is_complete}",
        session.current_step
    );

    Ok(TurnOutcome {
        question: reply,
        is_complete,
        current_step: session.current_step,
    })
}

/// Returns the session if it belongs to `user_id`.
pub async fn get_session<S>(
    store: &S,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<IntakeSessionRow, AppError>
where
    S: IntakeStore + ?Sized,
{
    store
        .find_session(session_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Intake session not found".to_string()))
}

pub fn is_completion_reply(reply: &str) -> bool {
    reply.to_lowercase().contains(COMPLETION_PHRASE)
}

/// Asks the model to distill the transcript. A reply that does not parse
/// yields empty data; a failed call is still an error.
async fn extract_intake_data(
    llm: &dyn LlmGateway,
    history: &[ConversationMessage],
) -> Result<IntakeData, AppError> {
    let transcript = render_transcript(history);
    let prompt = fill_template(
        EXTRACTION_PROMPT,
        &[("transcript", transcript.as_str()), ("json_only", JSON_ONLY_INSTRUCTION)],
    );

    let response = llm
        .send(
            EXTRACTION_SYSTEM,
            &[ChatTurn::user(prompt)],
            EXTRACTION_MAX_TOKENS,
        )
        .await
        .map_err(|e| AppError::Llm(format!("Intake extraction failed: {e}")))?;

    match parse_json_reply::<IntakeData>(&response) {
        Ok(data) => Ok(data),
        Err(e) => {
            warn!("Failed to extract intake data, continuing with empty data: {e}");
            Ok(IntakeData::default())
        }
    }
}

fn render_transcript(history: &[ConversationMessage]) -> String {
    history
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}
