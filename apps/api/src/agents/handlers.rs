//! Axum route handlers for the Agents API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::agents::chat::{
    chat_with_agent, get_conversation, AgentReply, Conversation, DEFAULT_CONVERSATION_LIMIT,
};
use crate::agents::personas::{find_persona, list_personas, PersonaSummary};
use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::{RequestSchema, Schema, ValidatedJson};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<Map<String, Value>>,
}

impl RequestSchema for ChatRequest {
    const SCHEMA: Schema = Schema::required(&["message"]);
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgentListResponse {
    pub agents: Vec<PersonaSummary>,
}

/// GET /api/agents
pub async fn handle_list_agents() -> Json<AgentListResponse> {
    Json(AgentListResponse {
        agents: list_personas(),
    })
}

/// GET /api/agents/:agentId
pub async fn handle_get_agent(Path(agent_id): Path<String>) -> Result<Json<PersonaSummary>, AppError> {
    find_persona(&agent_id)
        .map(|p| Json(p.summary()))
        .ok_or_else(|| AppError::NotFound("Agent not found".to_string()))
}

/// POST /api/agents/:agentId/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(agent_id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<AgentReply>, AppError> {
    let reply = chat_with_agent(
        state.store.as_ref(),
        state.llm.as_ref(),
        auth.user_id,
        &agent_id,
        &request.message,
        request.context,
    )
    .await?;

    Ok(Json(reply))
}

/// GET /api/agents/:agentId/conversation?limit=N
///
/// A missing or unparseable limit falls back to the default.
pub async fn handle_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(agent_id): Path<String>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Conversation>, AppError> {
    let limit = query
        .limit
        .and_then(|l| l.parse::<i64>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_CONVERSATION_LIMIT);

    let conversation =
        get_conversation(state.store.as_ref(), auth.user_id, &agent_id, limit).await?;
    Ok(Json(conversation))
}
