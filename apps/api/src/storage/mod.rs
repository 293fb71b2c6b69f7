//! Storage seams.
//!
//! Services take a storage handle as a parameter instead of reaching for a
//! global client. Production wires a single `PgStore` built around the
//! process-wide `PgPool`; tests use `memory::MemoryStore`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::intake::IntakeSessionRow;
use crate::models::interaction::AgentInteractionRow;
use crate::models::plan::{CareerPlanRow, PlanPhase};
use crate::models::progress::ProgressRow;
use crate::models::user::User;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait IntakeStore: Send + Sync {
    async fn insert_session(&self, session: &IntakeSessionRow) -> StoreResult<()>;

    /// The user's unfinished session, if any.
    async fn find_open_session(&self, user_id: Uuid) -> StoreResult<Option<IntakeSessionRow>>;

    /// Looks a session up by id, scoped to its owner.
    async fn find_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<IntakeSessionRow>>;

    /// Overwrites history, step, completion flag and collected data.
    async fn update_session(&self, session: &IntakeSessionRow) -> StoreResult<()>;
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Persists a new plan and its zeroed progress record atomically.
    async fn insert_plan_with_progress(
        &self,
        plan: &CareerPlanRow,
        progress: &ProgressRow,
    ) -> StoreResult<()>;

    async fn find_plan(&self, plan_id: Uuid, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>>;

    /// Most recently created plan for the user.
    async fn latest_plan(&self, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>>;

    async fn update_plan_phases(&self, plan_id: Uuid, phases: &[PlanPhase]) -> StoreResult<()>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Most recently created progress record for the user.
    async fn latest_progress(&self, user_id: Uuid) -> StoreResult<Option<ProgressRow>>;

    async fn progress_for_plan(&self, plan_id: Uuid) -> StoreResult<Option<ProgressRow>>;

    /// Single-row write of completed tasks, phase, streak and activity time.
    async fn save_progress(&self, progress: &ProgressRow) -> StoreResult<()>;
}

#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn insert_interaction(&self, interaction: &AgentInteractionRow) -> StoreResult<()>;

    /// Newest first.
    async fn recent_interactions(
        &self,
        user_id: Uuid,
        agent_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<AgentInteractionRow>>;
}

/// Everything the HTTP layer needs. Carried in `AppState` as `Arc<dyn Store>`.
pub trait Store: UserStore + IntakeStore + PlanStore + ProgressStore + InteractionStore {}

impl<T> Store for T where T: UserStore + IntakeStore + PlanStore + ProgressStore + InteractionStore
{}
