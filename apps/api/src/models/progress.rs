use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    /// Unique task ids, kept sorted.
    pub completed_tasks: Vec<String>,
    /// Cached copy of the derived phase index; recomputed on every read and write.
    pub current_phase: i32,
    pub streak_days: i32,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ProgressRow {
    /// Zeroed record created alongside a new plan.
    pub fn new(user_id: Uuid, plan_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            plan_id,
            completed_tasks: Vec::new(),
            current_phase: 0,
            streak_days: 0,
            last_activity: now,
            created_at: now,
        }
    }
}
