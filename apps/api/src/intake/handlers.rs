//! Axum route handlers for the Intake API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::intake::session::{get_session, start_session, submit_message};
use crate::models::intake::{ConversationMessage, IntakeData};
use crate::state::AppState;
use crate::validation::{parse_id, RequestSchema, Schema, ValidatedJson};

const SESSION_NOT_FOUND: &str = "Intake session not found";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub session_id: Uuid,
    pub question: String,
    pub current_step: i32,
    pub is_complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

impl RequestSchema for MessageRequest {
    const SCHEMA: Schema = Schema::required(&["message"]);
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub question: String,
    pub is_complete: bool,
    pub current_step: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub conversation_history: Vec<ConversationMessage>,
    pub current_step: i32,
    pub is_complete: bool,
    pub collected_data: IntakeData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/intake/start
pub async fn handle_start(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StartResponse>, AppError> {
    let started = start_session(state.store.as_ref(), state.llm.as_ref(), auth.user_id).await?;

    Ok(Json(StartResponse {
        session_id: started.session_id,
        question: started.question,
        current_step: 1,
        is_complete: false,
    }))
}

/// POST /api/intake/:sessionId/message
pub async fn handle_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
    ValidatedJson(request): ValidatedJson<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let session_id = parse_id(&session_id, SESSION_NOT_FOUND)?;

    let outcome = submit_message(
        state.store.as_ref(),
        state.llm.as_ref(),
        session_id,
        auth.user_id,
        &request.message,
    )
    .await?;

    Ok(Json(MessageResponse {
        question: outcome.question,
        is_complete: outcome.is_complete,
        current_step: outcome.current_step,
    }))
}

/// GET /api/intake/:sessionId
pub async fn handle_get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id, SESSION_NOT_FOUND)?;
    let session = get_session(state.store.as_ref(), session_id, auth.user_id).await?;

    Ok(Json(SessionResponse {
        id: session.id,
        conversation_history: session.conversation_history.0,
        current_step: session.current_step,
        is_complete: session.is_complete,
        collected_data: session.collected_data.0,
        created_at: session.created_at,
        updated_at: session.updated_at,
    }))
}
