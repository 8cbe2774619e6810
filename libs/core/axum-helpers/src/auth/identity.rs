use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::errors::{AppError, ErrorCode};

/// Failure to establish who is calling.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signed with unknown key id: {0}")]
    UnknownKey(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::KeyFetch(msg) => {
                AppError::upstream(ErrorCode::IdentityProviderError, msg)
            }
            AuthError::MissingToken => AppError::Unauthorized(err.to_string()),
            // Validation details stay in the logs
            other => {
                tracing::debug!("Identity verification failed: {}", other);
                AppError::Unauthorized("Invalid identity token".to_string())
            }
        }
    }
}

/// Claims of a verified identity token.
///
/// Serializes as the full claim set with `uid` added, so handlers can echo
/// the identity back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifiedIdentity(Map<String, Value>);

impl VerifiedIdentity {
    /// Wrap decoded claims; `uid` is filled from `sub` when absent.
    pub fn from_claims(mut claims: Map<String, Value>) -> Result<Self, AuthError> {
        let sub = claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("missing subject".to_string()))?
            .to_string();

        claims.entry("uid").or_insert(Value::String(sub));
        Ok(Self(claims))
    }

    pub fn uid(&self) -> &str {
        self.0.get("uid").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }
}

/// Verifies bearer tokens against an external identity service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_uid_defaults_to_subject() {
        let identity =
            VerifiedIdentity::from_claims(claims(json!({"sub": "user-1", "email": "a@b.c"})))
                .unwrap();
        assert_eq!(identity.uid(), "user-1");
        assert_eq!(identity.email(), Some("a@b.c"));
    }

    #[test]
    fn test_empty_subject_is_rejected() {
        let err = VerifiedIdentity::from_claims(claims(json!({"sub": ""}))).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_serializes_as_flat_claims() {
        let identity = VerifiedIdentity::from_claims(claims(json!({"sub": "u"}))).unwrap();
        assert_eq!(
            serde_json::to_value(&identity).unwrap(),
            json!({"sub": "u", "uid": "u"})
        );
    }

    #[test]
    fn test_key_fetch_failure_is_not_unauthorized() {
        let err: AppError = AuthError::KeyFetch("timeout".to_string()).into();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let err: AppError = AuthError::UnknownKey("kid".to_string()).into();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
