//! HS256 access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_days: i64,
}

impl From<&Config> for JwtConfig {
    fn from(config: &Config) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiry_days: config.jwt_expiry_days,
        }
    }
}

pub fn generate_token(user_id: Uuid, email: &str, config: &JwtConfig) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(config.expiry_days)).timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?)
}

/// Checks signature and expiry. Expiry is reported separately so clients can
/// tell a stale session from a forged one.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiry_days: 7,
        }
    }

    #[test]
    fn test_token_carries_user_and_expiry() {
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, "sam@example.com", &config()).unwrap();
        let claims = validate_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "sam@example.com");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = generate_token(Uuid::new_v4(), "a@b.co", &config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            expiry_days: 7,
        };
        assert!(matches!(
            validate_token(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let expired = JwtConfig {
            secret: "test-secret".to_string(),
            expiry_days: -1,
        };
        let token = generate_token(Uuid::new_v4(), "a@b.co", &expired).unwrap();
        assert!(matches!(
            validate_token(&token, &config()),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(
            validate_token("not.a.jwt", &config()),
            Err(AuthError::InvalidToken)
        ));
    }
}
