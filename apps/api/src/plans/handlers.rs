//! Axum route handlers for the Plans API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::plan::PlanPhase;
use crate::plans::generator::{generate_plan, get_user_plan, regenerate_phase, PlanView};
use crate::state::AppState;
use crate::validation::{parse_id, JsonOrDefault, RequestSchema, Schema, ValidatedJson};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub session_id: String,
}

impl RequestSchema for GenerateRequest {
    const SCHEMA: Schema = Schema::required(&["sessionId"]);
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub plan_id: Uuid,
    pub phases: Vec<PlanPhase>,
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    #[serde(default)]
    pub phase_number: Option<u32>,
}

impl RequestSchema for RegenerateRequest {
    const SCHEMA: Schema = Schema::required(&[]);
}

#[derive(Debug, Serialize)]
pub struct RegenerateResponse {
    pub phases: Vec<PlanPhase>,
    pub message: String,
}

/// POST /api/plans/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), AppError> {
    let session_id = parse_id(&request.session_id, "Intake session not found")?;
    let generated =
        generate_plan(state.store.as_ref(), state.llm.as_ref(), session_id, auth.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            plan_id: generated.plan_id,
            phases: generated.phases,
            message: "Career plan generated successfully",
        }),
    ))
}

/// GET /api/plans
pub async fn handle_get_plan(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PlanView>, AppError> {
    get_user_plan(state.store.as_ref(), auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(
                "No career plan found. Please complete intake and generate a plan first."
                    .to_string(),
            )
        })
}

/// PUT /api/plans/:planId/regenerate
///
/// The body is optional; without `phaseNumber` the whole plan would be
/// regenerated, which is not supported.
pub async fn handle_regenerate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<String>,
    JsonOrDefault(request): JsonOrDefault<RegenerateRequest>,
) -> Result<Json<RegenerateResponse>, AppError> {
    let plan_id = parse_id(&plan_id, "Plan not found")?;
    let phase_number = request.phase_number;
    let phases = regenerate_phase(
        state.store.as_ref(),
        state.llm.as_ref(),
        plan_id,
        auth.user_id,
        phase_number,
    )
    .await?;

    let message = match phase_number {
        Some(n) => format!("Phase {n} regenerated successfully"),
        None => "Plan regenerated successfully".to_string(),
    };

    Ok(Json(RegenerateResponse { phases, message }))
}
