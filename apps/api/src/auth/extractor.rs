use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::auth::jwt::validate_token;
use crate::auth::AuthError;
use crate::errors::AppError;
use crate::state::AppState;

/// Caller identity taken from `Authorization: Bearer <token>`.
/// Adding it to a handler's arguments makes the route require a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = validate_token(token, &state.jwt)?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
