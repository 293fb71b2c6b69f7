use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::llm_client::{ChatRole, ChatTurn};

/// A stored interview turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn now(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Structured fields pulled out of a finished interview.
/// Every field is optional; an empty value means extraction found nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntakeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
}

#[derive(Debug, Clone, FromRow)]
pub struct IntakeSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub conversation_history: Json<Vec<ConversationMessage>>,
    pub current_step: i32,
    pub is_complete: bool,
    pub collected_data: Json<IntakeData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IntakeSessionRow {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            conversation_history: Json(Vec::new()),
            current_step: 0,
            is_complete: false,
            collected_data: Json(IntakeData::default()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intake_data_accepts_nulls_and_camel_case() {
        let data: IntakeData = serde_json::from_value(serde_json::json!({
            "currentRole": "Accountant",
            "targetRole": "Data Analyst",
            "timeline": null,
            "skills": ["Excel", "SQL"],
            "constraints": {"time": "10h/week", "budget": null, "location": null}
        }))
        .unwrap();
        assert_eq!(data.current_role.as_deref(), Some("Accountant"));
        assert!(data.timeline.is_none());
        assert_eq!(data.skills.unwrap().len(), 2);
        assert_eq!(data.constraints.unwrap().time.as_deref(), Some("10h/week"));
    }

    #[test]
    fn test_empty_intake_data_serializes_to_empty_object() {
        let json = serde_json::to_value(IntakeData::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
