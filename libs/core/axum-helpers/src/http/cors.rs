use axum::http::{HeaderValue, Method, header};
use core_config::{ConfigError, env_optional};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// - unset or blank: any origin, any method, any header, credentials allowed
///   (the request origin is mirrored back)
/// - comma-separated list: only those origins, with credentials
pub fn cors_layer_from_env() -> Result<CorsLayer, ConfigError> {
    match env_optional("CORS_ALLOWED_ORIGIN") {
        None => {
            tracing::info!("CORS_ALLOWED_ORIGIN not set, allowing all origins");
            Ok(create_permissive_cors_layer())
        }
        Some(raw) => {
            let origins = parse_origins(&raw)?;
            tracing::info!("CORS configured with allowed origins: {}", raw);
            Ok(create_cors_layer(origins))
        }
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>().map_err(|e| ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: format!("{}: {}", s, e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(ConfigError::ParseError {
            key: "CORS_ALLOWED_ORIGIN".to_string(),
            details: "no origins listed".to_string(),
        });
    }

    Ok(origins)
}

/// CORS layer restricted to the given origins.
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Allows every origin while still permitting credentials.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::very_permissive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    #[test]
    fn test_parse_origins_splits_and_trims() {
        let origins = parse_origins("http://localhost:3000, https://pods.example.com ,").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://pods.example.com");
    }

    #[test]
    fn test_parse_origins_rejects_empty_list() {
        assert!(parse_origins(" , ").is_err());
    }

    async fn preflight(layer: CorsLayer, origin: &str) -> axum::http::Response<Body> {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(layer)
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_permissive_layer_mirrors_any_origin_with_credentials() {
        let response = preflight(create_permissive_cors_layer(), "https://anywhere.test").await;
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://anywhere.test"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn test_restricted_layer_ignores_unknown_origin() {
        let layer = create_cors_layer(vec![HeaderValue::from_static("https://app.test")]);
        let response = preflight(layer, "https://evil.test").await;
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[test]
    fn test_from_env_unset_is_permissive() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            assert!(cors_layer_from_env().is_ok());
        });
    }
}
