use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One exchange with an advisor persona. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgentInteractionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub agent_id: String,
    pub message: String,
    pub response: String,
    pub context: Json<Value>,
    pub created_at: DateTime<Utc>,
}
