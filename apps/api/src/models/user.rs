use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Account row. Not `Serialize`: handlers shape their own responses so the
/// password hash never leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
