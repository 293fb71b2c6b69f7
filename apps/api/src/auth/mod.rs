//! Account registration, login and bearer-token verification.

pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;

use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::TokenExpired => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::Signing(_) | AuthError::Hashing(_) => AppError::Internal(err.into()),
        }
    }
}
