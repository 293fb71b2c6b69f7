//! Request body validation.
//!
//! Every JSON body type declares a static `Schema`. `ValidatedJson<T>` checks
//! the raw value against it before deserializing into `T`, so handlers only
//! ever see bodies that passed.

use std::sync::LazyLock;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Must be present and non-null; strings must also be non-blank.
    pub required: &'static [&'static str],
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub booleans: &'static [&'static str],
}

impl Schema {
    pub const fn required(fields: &'static [&'static str]) -> Self {
        Self {
            required: fields,
            email: None,
            password: None,
            booleans: &[],
        }
    }

    pub fn check(&self, body: &Value) -> Result<(), AppError> {
        let object = body
            .as_object()
            .ok_or_else(|| AppError::Validation("Request body must be a JSON object".into()))?;

        for field in self.required {
            let present = match object.get(*field) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }

        if let Some(field) = self.email {
            if let Some(value) = object.get(field).and_then(Value::as_str) {
                if !EMAIL_PATTERN.is_match(value) {
                    return Err(AppError::Validation("Invalid email format".into()));
                }
            }
        }

        if let Some(field) = self.password {
            if let Some(value) = object.get(field).and_then(Value::as_str) {
                if value.chars().count() < MIN_PASSWORD_LEN {
                    return Err(AppError::Validation(format!(
                        "Password must be at least {MIN_PASSWORD_LEN} characters"
                    )));
                }
            }
        }

        for field in self.booleans {
            if let Some(value) = object.get(*field) {
                if !value.is_boolean() {
                    return Err(AppError::Validation(format!("{field} must be a boolean")));
                }
            }
        }

        Ok(())
    }
}

/// Implemented by every request body read through `ValidatedJson`.
pub trait RequestSchema: DeserializeOwned {
    const SCHEMA: Schema;
}

/// JSON extractor that applies `T::SCHEMA` and reports failures as
/// `AppError::Validation`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: RequestSchema,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        T::SCHEMA.check(&value)?;

        let body = serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;
        Ok(ValidatedJson(body))
    }
}

/// Like `ValidatedJson`, but an empty body reads as `T::default()` instead
/// of being rejected. A non-empty body must still be valid JSON.
#[derive(Debug)]
pub struct JsonOrDefault<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrDefault<T>
where
    S: Send + Sync,
    T: RequestSchema + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonOrDefault(T::default()));
        }

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
        T::SCHEMA.check(&value)?;

        let body = serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;
        Ok(JsonOrDefault(body))
    }
}

/// Parses a path id. A malformed id cannot name an existing row, so it is
/// reported the same way as a missing one.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SIGNUP: Schema = Schema {
        required: &["email", "name", "password"],
        email: Some("email"),
        password: Some("password"),
        booleans: &[],
    };

    const TOGGLE: Schema = Schema {
        required: &["taskId", "completed"],
        email: None,
        password: None,
        booleans: &["completed"],
    };

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_blank_fields_are_rejected() {
        let err = SIGNUP
            .check(&json!({"email": "a@b.co", "password": "longenough"}))
            .unwrap_err();
        assert_eq!(message(err), "name is required");

        let err = SIGNUP
            .check(&json!({"email": "a@b.co", "name": "   ", "password": "longenough"}))
            .unwrap_err();
        assert_eq!(message(err), "name is required");
    }

    #[test]
    fn test_email_and_password_rules() {
        let err = SIGNUP
            .check(&json!({"email": "not-an-email", "name": "A", "password": "longenough"}))
            .unwrap_err();
        assert_eq!(message(err), "Invalid email format");

        let err = SIGNUP
            .check(&json!({"email": "a@b.co", "name": "A", "password": "short"}))
            .unwrap_err();
        assert!(message(err).contains("at least 8"));

        assert!(SIGNUP
            .check(&json!({"email": "a@b.co", "name": "A", "password": "longenough"}))
            .is_ok());
    }

    #[test]
    fn test_false_counts_as_present() {
        assert!(TOGGLE
            .check(&json!({"taskId": "task_1_1_1", "completed": false}))
            .is_ok());
    }

    #[test]
    fn test_boolean_field_rejects_strings() {
        let err = TOGGLE
            .check(&json!({"taskId": "task_1_1_1", "completed": "yes"}))
            .unwrap_err();
        assert_eq!(message(err), "completed must be a boolean");
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(Schema::required(&[]).check(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_parse_id_maps_garbage_to_not_found() {
        assert!(matches!(
            parse_id("nope", "Plan not found"),
            Err(AppError::NotFound(msg)) if msg == "Plan not found"
        ));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "x").unwrap(), id);
    }
}
