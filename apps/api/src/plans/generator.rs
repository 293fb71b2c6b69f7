//! Plan generation and phase regeneration.
//!
//! Both paths make exactly one model call and parse the reply strictly. A
//! reply that does not match the phase schema is a generation failure; nothing
//! is persisted and nothing is retried.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::json::parse_json_reply;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ChatTurn, LlmGateway};
use crate::models::intake::IntakeData;
use crate::models::plan::{CareerPlanRow, PlanPhase};
use crate::models::progress::ProgressRow;
use crate::plans::prompts::{PLAN_SYSTEM, PROFILE_TEMPLATE, REGENERATE_PHASE_TEMPLATE};
use crate::progress::tracker::current_phase_index;
use crate::storage::{IntakeStore, PlanStore, ProgressStore};

const GENERATE_MAX_TOKENS: u32 = 8000;
const REGENERATE_MAX_TOKENS: u32 = 4000;
const GENERATOR_AGENT_ID: &str = "plan_generator";
const NOT_SPECIFIED: &str = "Not specified";

pub const GENERATION_FAILED: &str = "Failed to generate valid plan. Please try again.";
pub const REGENERATION_FAILED: &str = "Failed to regenerate phase";

#[derive(Debug, Deserialize)]
struct PlanEnvelope {
    phases: Vec<PlanPhase>,
}

#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    pub plan_id: Uuid,
    pub phases: Vec<PlanPhase>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProgress {
    pub id: Uuid,
    pub completed_tasks: Vec<String>,
    pub current_phase: usize,
    pub streak_days: i32,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub id: Uuid,
    pub target_role: String,
    pub current_role: String,
    pub timeline: String,
    pub phases: Vec<PlanPhase>,
    pub created_at: DateTime<Utc>,
    pub progress: Option<PlanProgress>,
}

/// Generates and stores a plan from a completed intake session.
pub async fn generate_plan<S>(
    store: &S,
    llm: &dyn LlmGateway,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<GeneratedPlan, AppError>
where
    S: IntakeStore + PlanStore + ?Sized,
{
    let session = store
        .find_session(session_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Intake session not found".to_string()))?;

    if !session.is_complete {
        return Err(AppError::UnprocessableEntity(
            "Intake session is not complete. Please finish the intake first.".to_string(),
        ));
    }

    let data = &session.collected_data.0;
    info!("Generating career plan for user {user_id} from session {session_id}");

    let response = llm
        .send(
            PLAN_SYSTEM,
            &[ChatTurn::user(build_profile(data))],
            GENERATE_MAX_TOKENS,
        )
        .await
        .map_err(|e| AppError::Llm(format!("Plan generation call failed: {e}")))?;

    let phases = match parse_json_reply::<PlanEnvelope>(&response) {
        Ok(envelope) if !envelope.phases.is_empty() => envelope.phases,
        Ok(_) => {
            error!("Plan generation returned no phases");
            return Err(AppError::GenerationFailed(GENERATION_FAILED.to_string()));
        }
        Err(e) => {
            error!(
                "Failed to parse plan generation response: {e}; response starts: {}",
                preview(&response)
            );
            return Err(AppError::GenerationFailed(GENERATION_FAILED.to_string()));
        }
    };

    let now = Utc::now();
    let plan = CareerPlanRow {
        id: Uuid::new_v4(),
        user_id,
        target_role: or_default(&data.target_role, "Career Transition"),
        current_role: or_default(&data.current_role, "Current Position"),
        timeline: or_default(&data.timeline, "Flexible"),
        phases: Json(phases),
        agent_id: GENERATOR_AGENT_ID.to_string(),
        created_at: now,
        updated_at: now,
    };
    let progress = ProgressRow::new(user_id, plan.id);
    store.insert_plan_with_progress(&plan, &progress).await?;

    info!(
        "Career plan {} created for user {user_id} with {} phases",
        plan.id,
        plan.phases.len()
    );

    Ok(GeneratedPlan {
        plan_id: plan.id,
        phases: plan.phases.0,
    })
}

/// Latest plan for the user together with its progress record.
pub async fn get_user_plan<S>(store: &S, user_id: Uuid) -> Result<Option<PlanView>, AppError>
where
    S: PlanStore + ProgressStore + ?Sized,
{
    let Some(plan) = store.latest_plan(user_id).await? else {
        return Ok(None);
    };

    let progress = store.progress_for_plan(plan.id).await?.map(|p| {
        let completed: BTreeSet<String> = p.completed_tasks.iter().cloned().collect();
        PlanProgress {
            id: p.id,
            current_phase: current_phase_index(&plan.phases, &completed),
            completed_tasks: p.completed_tasks,
            streak_days: p.streak_days,
            last_activity: p.last_activity,
        }
    });

    Ok(Some(PlanView {
        id: plan.id,
        target_role: plan.target_role,
        current_role: plan.current_role,
        timeline: plan.timeline,
        phases: plan.phases.0,
        created_at: plan.created_at,
        progress,
    }))
}

/// Replaces one phase (1-based `phase_number`) with a freshly generated one.
/// Every other phase is written back unchanged.
pub async fn regenerate_phase<S>(
    store: &S,
    llm: &dyn LlmGateway,
    plan_id: Uuid,
    user_id: Uuid,
    phase_number: Option<u32>,
) -> Result<Vec<PlanPhase>, AppError>
where
    S: PlanStore + ?Sized,
{
    let plan = store
        .find_plan(plan_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))?;

    let Some(phase_number) = phase_number else {
        return Err(AppError::NotImplemented(
            "Full plan regeneration not yet implemented".to_string(),
        ));
    };

    let mut phases = plan.phases.0.clone();
    if phase_number == 0 || phase_number as usize > phases.len() {
        return Err(AppError::Validation(format!(
            "phaseNumber must be between 1 and {}",
            phases.len()
        )));
    }

    let phases_json = serde_json::to_string_pretty(&phases)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize phases: {e}")))?;
    let phase_label = phase_number.to_string();
    let prompt = fill_template(
        REGENERATE_PHASE_TEMPLATE,
        &[
            ("phase_number", phase_label.as_str()),
            ("target_role", plan.target_role.as_str()),
            ("current_role", plan.current_role.as_str()),
            ("timeline", plan.timeline.as_str()),
            ("phases_json", phases_json.as_str()),
        ],
    );

    let response = llm
        .send(PLAN_SYSTEM, &[ChatTurn::user(prompt)], REGENERATE_MAX_TOKENS)
        .await
        .map_err(|e| AppError::Llm(format!("Phase regeneration call failed: {e}")))?;

    let mut new_phase = parse_json_reply::<PlanPhase>(&response).map_err(|e| {
        error!(
            "Failed to parse regenerated phase {phase_number} for plan {plan_id}: {e}; response starts: {}",
            preview(&response)
        );
        AppError::GenerationFailed(REGENERATION_FAILED.to_string())
    })?;
    new_phase.phase_number = phase_number;

    phases[phase_number as usize - 1] = new_phase;
    store.update_plan_phases(plan_id, &phases).await?;

    info!("Regenerated phase {phase_number} of plan {plan_id}");

    Ok(phases)
}

fn build_profile(data: &IntakeData) -> String {
    let constraints = data.constraints.clone().unwrap_or_default();
    let skills = data
        .skills
        .as_ref()
        .filter(|s| !s.is_empty())
        .map(|s| s.join(", "));

    let field = |value: &Option<String>| or_default(value, NOT_SPECIFIED);

    fill_template(
        PROFILE_TEMPLATE,
        &[
            ("current_role", field(&data.current_role).as_str()),
            ("target_role", field(&data.target_role).as_str()),
            ("timeline", field(&data.timeline).as_str()),
            ("skills", field(&skills).as_str()),
            ("experience", field(&data.experience).as_str()),
            ("education", field(&data.education).as_str()),
            ("motivations", field(&data.motivations).as_str()),
            ("time", field(&constraints.time).as_str()),
            ("budget", field(&constraints.budget).as_str()),
            ("location", field(&constraints.location).as_str()),
        ],
    )
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn preview(response: &str) -> String {
    response.chars().take(500).collect()
}
