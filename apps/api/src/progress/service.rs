//! Store-bound progress operations.
//!
//! Every operation loads the user's latest progress record and its plan, and
//! every write is a single `save_progress` call.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::plan::CareerPlanRow;
use crate::models::progress::ProgressRow;
use crate::progress::tracker::{
    apply_task_update, completed_set, pending_milestone_tasks, progress_stats, ProgressStats,
};
use crate::progress::views::{self, Dashboard, DetailedProgress};
use crate::storage::{PlanStore, ProgressStore};

pub const NO_PROGRESS: &str = "No progress tracking found. Please generate a career plan first.";

async fn load<S>(store: &S, user_id: Uuid) -> Result<Option<(ProgressRow, CareerPlanRow)>, AppError>
where
    S: PlanStore + ProgressStore + ?Sized,
{
    let Some(progress) = store.latest_progress(user_id).await? else {
        return Ok(None);
    };
    match store.find_plan(progress.plan_id, user_id).await? {
        Some(plan) => Ok(Some((progress, plan))),
        None => {
            warn!(
                "Progress record {} points at missing plan {}",
                progress.id, progress.plan_id
            );
            Ok(None)
        }
    }
}

async fn load_required<S>(store: &S, user_id: Uuid) -> Result<(ProgressRow, CareerPlanRow), AppError>
where
    S: PlanStore + ProgressStore + ?Sized,
{
    load(store, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(NO_PROGRESS.to_string()))
}

pub async fn update_task<S>(
    store: &S,
    user_id: Uuid,
    task_id: &str,
    completed: bool,
) -> Result<ProgressStats, AppError>
where
    S: PlanStore + ProgressStore + ?Sized,
{
    let (mut progress, plan) = load_required(store, user_id).await?;

    apply_task_update(&mut progress, &plan.phases, task_id, completed, Utc::now());
    store.save_progress(&progress).await?;

    info!(
        "Progress updated for user {user_id}: task={task_id}, completed={completed}, streak={}",
        progress.streak_days
    );

    Ok(progress_stats(&progress, &plan.phases))
}

/// Completes every open task of the milestone with one write. Nothing open
/// (or an unknown milestone) means no write at all.
pub async fn complete_milestone<S>(
    store: &S,
    user_id: Uuid,
    milestone_id: &str,
) -> Result<ProgressStats, AppError>
where
    S: PlanStore + ProgressStore + ?Sized,
{
    let (mut progress, plan) = load_required(store, user_id).await?;

    let pending = pending_milestone_tasks(&plan.phases, milestone_id, &completed_set(&progress));
    if pending.is_empty() {
        return Ok(progress_stats(&progress, &plan.phases));
    }

    let now = Utc::now();
    for task_id in &pending {
        apply_task_update(&mut progress, &plan.phases, task_id, true, now);
    }
    store.save_progress(&progress).await?;

    info!(
        "Milestone {milestone_id} completed for user {user_id}: {} tasks",
        pending.len()
    );

    Ok(progress_stats(&progress, &plan.phases))
}

pub async fn get_detailed_progress<S>(
    store: &S,
    user_id: Uuid,
) -> Result<Option<DetailedProgress>, AppError>
where
    S: PlanStore + ProgressStore + ?Sized,
{
    Ok(load(store, user_id)
        .await?
        .map(|(progress, plan)| views::detailed_progress(&progress, &plan.phases)))
}

pub async fn get_dashboard<S>(store: &S, user_id: Uuid) -> Result<Option<Dashboard>, AppError>
where
    S: PlanStore + ProgressStore + ?Sized,
{
    Ok(load(store, user_id)
        .await?
        .map(|(progress, plan)| views::dashboard(&progress, &plan.phases, Utc::now())))
}
