//! Readiness check against the configured vector store.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check endpoint that actually reaches the vector store.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "vector_store",
        Box::pin(async {
            state
                .pods
                .health_check()
                .await
                .map_err(|e| format!("Vector store check failed: {}", e))
        }),
    )];

    run_health_checks(checks).await.into_response()
}
