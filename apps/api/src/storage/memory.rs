//! In-process store used by service and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::intake::IntakeSessionRow;
use crate::models::interaction::AgentInteractionRow;
use crate::models::plan::{CareerPlanRow, PlanPhase};
use crate::models::progress::ProgressRow;
use crate::models::user::User;
use crate::storage::{
    InteractionStore, IntakeStore, PlanStore, ProgressStore, StoreResult, UserStore,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<IntakeSessionRow>,
    plans: Vec<CareerPlanRow>,
    progress: Vec<ProgressRow>,
    interactions: Vec<AgentInteractionRow>,
    progress_writes: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save_progress` calls so far.
    pub fn progress_writes(&self) -> usize {
        self.tables.lock().unwrap().progress_writes
    }

    pub fn session(&self, id: Uuid) -> Option<IntakeSessionRow> {
        let tables = self.tables.lock().unwrap();
        tables.sessions.iter().find(|s| s.id == id).cloned()
    }

    pub fn plan(&self, id: Uuid) -> Option<CareerPlanRow> {
        let tables = self.tables.lock().unwrap();
        tables.plans.iter().find(|p| p.id == id).cloned()
    }

    pub fn put_session(&self, session: IntakeSessionRow) {
        self.tables.lock().unwrap().sessions.push(session);
    }

    pub fn put_plan(&self, plan: CareerPlanRow, progress: ProgressRow) {
        let mut tables = self.tables.lock().unwrap();
        tables.plans.push(plan);
        tables.progress.push(progress);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.tables.lock().unwrap().users.push(user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl IntakeStore for MemoryStore {
    async fn insert_session(&self, session: &IntakeSessionRow) -> StoreResult<()> {
        self.tables.lock().unwrap().sessions.push(session.clone());
        Ok(())
    }

    async fn find_open_session(&self, user_id: Uuid) -> StoreResult<Option<IntakeSessionRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id && !s.is_complete)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn find_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<IntakeSessionRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.id == session_id && s.user_id == user_id)
            .cloned())
    }

    async fn update_session(&self, session: &IntakeSessionRow) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables.sessions.iter_mut().find(|s| s.id == session.id) {
            *existing = session.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn insert_plan_with_progress(
        &self,
        plan: &CareerPlanRow,
        progress: &ProgressRow,
    ) -> StoreResult<()> {
        self.put_plan(plan.clone(), progress.clone());
        Ok(())
    }

    async fn find_plan(&self, plan_id: Uuid, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .plans
            .iter()
            .find(|p| p.id == plan_id && p.user_id == user_id)
            .cloned())
    }

    async fn latest_plan(&self, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .plans
            .iter()
            .filter(|p| p.user_id == user_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn update_plan_phases(&self, plan_id: Uuid, phases: &[PlanPhase]) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(plan) = tables.plans.iter_mut().find(|p| p.id == plan_id) {
            plan.phases.0 = phases.to_vec();
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn latest_progress(&self, user_id: Uuid) -> StoreResult<Option<ProgressRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn progress_for_plan(&self, plan_id: Uuid) -> StoreResult<Option<ProgressRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .progress
            .iter()
            .filter(|p| p.plan_id == plan_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn save_progress(&self, progress: &ProgressRow) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.progress_writes += 1;
        if let Some(existing) = tables.progress.iter_mut().find(|p| p.id == progress.id) {
            *existing = progress.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl InteractionStore for MemoryStore {
    async fn insert_interaction(&self, interaction: &AgentInteractionRow) -> StoreResult<()> {
        self.tables
            .lock()
            .unwrap()
            .interactions
            .push(interaction.clone());
        Ok(())
    }

    async fn recent_interactions(
        &self,
        user_id: Uuid,
        agent_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<AgentInteractionRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .interactions
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id && i.agent_id == agent_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
