use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::intake::IntakeSessionRow;
use crate::models::interaction::AgentInteractionRow;
use crate::models::plan::{CareerPlanRow, PlanPhase};
use crate::models::progress::ProgressRow;
use crate::models::user::User;
use crate::storage::{
    InteractionStore, IntakeStore, PlanStore, ProgressStore, StoreResult, UserStore,
};

/// PostgreSQL-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl IntakeStore for PgStore {
    async fn insert_session(&self, session: &IntakeSessionRow) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO intake_sessions
                (id, user_id, conversation_history, current_step, is_complete,
                 collected_data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.conversation_history)
        .bind(session.current_step)
        .bind(session.is_complete)
        .bind(&session.collected_data)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_open_session(&self, user_id: Uuid) -> StoreResult<Option<IntakeSessionRow>> {
        sqlx::query_as::<_, IntakeSessionRow>(
            r#"
            SELECT * FROM intake_sessions
            WHERE user_id = $1 AND NOT is_complete
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<IntakeSessionRow>> {
        sqlx::query_as::<_, IntakeSessionRow>(
            "SELECT * FROM intake_sessions WHERE id = $1 AND user_id = $2",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_session(&self, session: &IntakeSessionRow) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE intake_sessions
            SET conversation_history = $2,
                current_step = $3,
                is_complete = $4,
                collected_data = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(session.id)
        .bind(&session.conversation_history)
        .bind(session.current_step)
        .bind(session.is_complete)
        .bind(&session.collected_data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PlanStore for PgStore {
    async fn insert_plan_with_progress(
        &self,
        plan: &CareerPlanRow,
        progress: &ProgressRow,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO career_plans
                (id, user_id, target_role, current_role, timeline, phases, agent_id,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(plan.id)
        .bind(plan.user_id)
        .bind(&plan.target_role)
        .bind(&plan.current_role)
        .bind(&plan.timeline)
        .bind(&plan.phases)
        .bind(&plan.agent_id)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO progress_tracking
                (id, user_id, plan_id, completed_tasks, current_phase, streak_days,
                 last_activity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(progress.id)
        .bind(progress.user_id)
        .bind(progress.plan_id)
        .bind(&progress.completed_tasks)
        .bind(progress.current_phase)
        .bind(progress.streak_days)
        .bind(progress.last_activity)
        .bind(progress.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    async fn find_plan(&self, plan_id: Uuid, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>> {
        sqlx::query_as::<_, CareerPlanRow>(
            "SELECT * FROM career_plans WHERE id = $1 AND user_id = $2",
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn latest_plan(&self, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>> {
        sqlx::query_as::<_, CareerPlanRow>(
            "SELECT * FROM career_plans WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_plan_phases(&self, plan_id: Uuid, phases: &[PlanPhase]) -> StoreResult<()> {
        sqlx::query("UPDATE career_plans SET phases = $2, updated_at = NOW() WHERE id = $1")
            .bind(plan_id)
            .bind(Json(phases))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn latest_progress(&self, user_id: Uuid) -> StoreResult<Option<ProgressRow>> {
        sqlx::query_as::<_, ProgressRow>(
            "SELECT * FROM progress_tracking WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn progress_for_plan(&self, plan_id: Uuid) -> StoreResult<Option<ProgressRow>> {
        sqlx::query_as::<_, ProgressRow>(
            "SELECT * FROM progress_tracking WHERE plan_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_progress(&self, progress: &ProgressRow) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE progress_tracking
            SET completed_tasks = $2,
                current_phase = $3,
                streak_days = $4,
                last_activity = $5
            WHERE id = $1
            "#,
        )
        .bind(progress.id)
        .bind(&progress.completed_tasks)
        .bind(progress.current_phase)
        .bind(progress.streak_days)
        .bind(progress.last_activity)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl InteractionStore for PgStore {
    async fn insert_interaction(&self, interaction: &AgentInteractionRow) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO agent_interactions
                (id, user_id, agent_id, message, response, context, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(interaction.id)
        .bind(interaction.user_id)
        .bind(&interaction.agent_id)
        .bind(&interaction.message)
        .bind(&interaction.response)
        .bind(&interaction.context)
        .bind(interaction.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recent_interactions(
        &self,
        user_id: Uuid,
        agent_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<AgentInteractionRow>> {
        sqlx::query_as::<_, AgentInteractionRow>(
            r#"
            SELECT * FROM agent_interactions
            WHERE user_id = $1 AND agent_id = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(agent_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
