//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::validation::{RequestSchema, Schema, ValidatedJson};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RequestSchema for RegisterRequest {
    const SCHEMA: Schema = Schema {
        required: &["email", "name", "password"],
        email: Some("email"),
        password: Some("password"),
        booleans: &[],
    };
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl RequestSchema for LoginRequest {
    const SCHEMA: Schema = Schema {
        required: &["email", "password"],
        email: Some("email"),
        password: None,
        booleans: &[],
    };
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn auth_response(user: &User, state: &AppState) -> Result<AuthResponse, AppError> {
    let token = generate_token(user.id, &user.email, &state.jwt)?;
    Ok(AuthResponse {
        token,
        user: PublicUser {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        },
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if state
        .store
        .find_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(
            "User with this email already exists".to_string(),
        ));
    }

    let user = User {
        id: Uuid::new_v4(),
        email: request.email,
        name: request.name,
        password_hash: hash_password(&request.password)?,
        created_at: Utc::now(),
    };
    state.store.insert_user(&user).await?;

    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(auth_response(&user, &state)?)))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .store
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(Json(auth_response(&user, &state)?))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    }))
}
