//! Axum route handlers for the Progress API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::progress::service::{
    complete_milestone, get_dashboard, get_detailed_progress, update_task,
};
use crate::progress::tracker::ProgressStats;
use crate::progress::views::{Dashboard, DetailedProgress};
use crate::state::AppState;
use crate::validation::{RequestSchema, Schema, ValidatedJson};

const NO_PROGRESS_YET: &str = "No progress found. Please generate a career plan first.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateRequest {
    pub task_id: String,
    pub completed: bool,
}

impl RequestSchema for TaskUpdateRequest {
    const SCHEMA: Schema = Schema {
        required: &["taskId", "completed"],
        email: None,
        password: None,
        booleans: &["completed"],
    };
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ProgressStats,
    pub message: &'static str,
}

/// GET /api/progress
pub async fn handle_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Dashboard>, AppError> {
    get_dashboard(state.store.as_ref(), auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NO_PROGRESS_YET.to_string()))
}

/// GET /api/progress/detailed
pub async fn handle_detailed(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DetailedProgress>, AppError> {
    get_detailed_progress(state.store.as_ref(), auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NO_PROGRESS_YET.to_string()))
}

/// PUT /api/progress/task
pub async fn handle_update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<TaskUpdateRequest>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = update_task(
        state.store.as_ref(),
        auth.user_id,
        &request.task_id,
        request.completed,
    )
    .await?;

    Ok(Json(StatsResponse {
        stats,
        message: if request.completed {
            "Task marked as complete!"
        } else {
            "Task unmarked"
        },
    }))
}

/// POST /api/progress/milestone/:milestoneId/complete
pub async fn handle_complete_milestone(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(milestone_id): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = complete_milestone(state.store.as_ref(), auth.user_id, &milestone_id).await?;

    Ok(Json(StatsResponse {
        stats,
        message: "Milestone completed! Great job!",
    }))
}
