//! Persona chat.
//!
//! Each request replays the last few exchanges with the same persona, so a
//! conversation has continuity without any server-side session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::types::Json;
use tracing::info;
use uuid::Uuid;

use crate::agents::personas::find_persona;
use crate::errors::AppError;
use crate::llm_client::{ChatRole, ChatTurn, LlmGateway};
use crate::models::interaction::AgentInteractionRow;
use crate::storage::{InteractionStore, PlanStore};

/// Exchanges replayed into each chat request.
pub const HISTORY_WINDOW: i64 = 5;
pub const DEFAULT_CONVERSATION_LIMIT: i64 = 20;
const CHAT_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Serialize)]
pub struct ReplyMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReply {
    pub message: ReplyMessage,
    /// The persona id; each persona holds one running conversation per user.
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentRef {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionView {
    pub id: Uuid,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub agent: Option<AgentRef>,
    pub interactions: Vec<InteractionView>,
}

pub async fn chat_with_agent<S>(
    store: &S,
    llm: &dyn LlmGateway,
    user_id: Uuid,
    agent_id: &str,
    message: &str,
    context: Option<Map<String, Value>>,
) -> Result<AgentReply, AppError>
where
    S: InteractionStore + PlanStore + ?Sized,
{
    let persona = find_persona(agent_id)
        .ok_or_else(|| AppError::NotFound(format!("Agent {agent_id} not found")))?;

    let recent = store
        .recent_interactions(user_id, agent_id, HISTORY_WINDOW)
        .await?;
    let mut turns: Vec<ChatTurn> = recent
        .iter()
        .rev()
        .flat_map(|i| {
            [
                ChatTurn::user(i.message.clone()),
                ChatTurn::assistant(i.response.clone()),
            ]
        })
        .collect();
    turns.push(ChatTurn::user(message));

    let context_block = match &context {
        Some(ctx) => {
            let pretty = serde_json::to_string_pretty(ctx).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to serialize chat context: {e}"))
            })?;
            format!("\n\nAdditional Context:\n{pretty}")
        }
        None => match store.latest_plan(user_id).await? {
            Some(plan) => format!(
                "\n\nUser's Career Transition:\n- Current Role: {}\n- Target Role: {}\n- Timeline: {}",
                plan.current_role, plan.target_role, plan.timeline
            ),
            None => String::new(),
        },
    };
    let system = format!("{}{context_block}", persona.system_prompt);

    let response = llm
        .send(&system, &turns, CHAT_MAX_TOKENS)
        .await
        .map_err(|e| AppError::Llm(format!("Agent chat failed: {e}")))?;

    let interaction = AgentInteractionRow {
        id: Uuid::new_v4(),
        user_id,
        agent_id: agent_id.to_string(),
        message: message.to_string(),
        response: response.clone(),
        context: Json(Value::Object(context.unwrap_or_default())),
        created_at: Utc::now(),
    };
    store.insert_interaction(&interaction).await?;

    info!(
        "Agent interaction completed: user={user_id}, agent={}",
        persona.name
    );

    Ok(AgentReply {
        message: ReplyMessage {
            id: interaction.id,
            role: ChatRole::Assistant,
            content: response,
            timestamp: interaction.created_at,
        },
        conversation_id: agent_id.to_string(),
    })
}

/// Most recent `limit` exchanges with the persona, oldest first. An unknown
/// persona id yields `agent: None` rather than an error.
pub async fn get_conversation<S>(
    store: &S,
    user_id: Uuid,
    agent_id: &str,
    limit: i64,
) -> Result<Conversation, AppError>
where
    S: InteractionStore + ?Sized,
{
    let mut interactions = store.recent_interactions(user_id, agent_id, limit).await?;
    interactions.reverse();

    Ok(Conversation {
        agent: find_persona(agent_id).map(|p| AgentRef {
            id: p.id,
            name: p.name,
            role: p.role,
        }),
        interactions: interactions
            .into_iter()
            .map(|i| InteractionView {
                id: i.id,
                message: i.message,
                response: i.response,
                timestamp: i.created_at,
            })
            .collect(),
    })
}
