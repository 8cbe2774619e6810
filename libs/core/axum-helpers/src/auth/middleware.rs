use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use super::identity::{AuthError, IdentityVerifier};
use crate::errors::AppError;

/// Shared verifier handle used as middleware state.
pub type SharedVerifier = Arc<dyn IdentityVerifier>;

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::MalformedToken("expected `Bearer <token>`".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedToken(format!(
            "unsupported scheme {}",
            scheme
        )));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

/// Identity middleware.
///
/// Verifies the bearer token and inserts the
/// [`VerifiedIdentity`](super::VerifiedIdentity) into request extensions.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/pod", post(handler))
///     .layer(axum::middleware::from_fn_with_state(verifier, require_identity));
/// ```
pub async fn require_identity(
    State(verifier): State<SharedVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let identity = verifier.verify(token).await?;

    tracing::debug!(uid = %identity.uid(), "Request authenticated");

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::{MockIdentityVerifier, VerifiedIdentity};
    use axum::{Extension, Router, body::Body, http::StatusCode, routing::get};
    use serde_json::json;
    use tower::ServiceExt;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(extract_bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn test_extract_bearer_token_failures() {
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            extract_bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(matches!(
            extract_bearer_token(&headers("Bearer ")),
            Err(AuthError::MissingToken)
        ));
    }

    fn app(verifier: MockIdentityVerifier) -> Router {
        let verifier: SharedVerifier = Arc::new(verifier);
        Router::new()
            .route(
                "/whoami",
                get(|Extension(identity): Extension<VerifiedIdentity>| async move {
                    identity.uid().to_string()
                }),
            )
            .layer(axum::middleware::from_fn_with_state(verifier, require_identity))
    }

    fn request(auth: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_verify()
            .withf(|token| token.to_string() == "good")
            .times(1)
            .returning(|_| {
                let claims = json!({"sub": "user-7"}).as_object().cloned().unwrap();
                VerifiedIdentity::from_claims(claims)
            });

        let response = app(verifier).oneshot(request(Some("Bearer good"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_is_401_without_calling_verifier() {
        let mut verifier = MockIdentityVerifier::new();
        verifier.expect_verify().never();

        let response = app(verifier).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rejected_token_is_401() {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(AuthError::InvalidToken("expired".to_string())));

        let response = app(verifier).oneshot(request(Some("Bearer old"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_key_fetch_failure_is_500() {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(AuthError::KeyFetch("connection refused".to_string())));

        let response = app(verifier).oneshot(request(Some("Bearer any"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
