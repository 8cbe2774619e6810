//! Authenticated pod creation.
//!
//! Only verifies the caller and echoes the identity back; documents are
//! loaded through the seed endpoints.

use axum::{Extension, Json, Router, middleware, routing::post};
use axum_helpers::errors::responses::UnauthorizedResponse;
use axum_helpers::{VerifiedIdentity, require_identity};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

pub const TAG: &str = "Pods";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IdentityGreeting {
    /// Claims of the verified ID token
    #[serde(rename = "Hello")]
    #[schema(value_type = Object)]
    pub hello: VerifiedIdentity,
}

pub fn router(state: &AppState) -> Router {
    Router::new()
        .route("/pod", post(create_pod))
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            require_identity,
        ))
}

/// Create a pod for the authenticated caller
///
/// Requires `Authorization: Bearer <Firebase ID token>`.
#[utoipa::path(
    post,
    path = "/pod",
    tag = TAG,
    responses(
        (status = 200, description = "Caller identity", body = IdentityGreeting),
        (status = 401, response = UnauthorizedResponse)
    )
)]
pub async fn create_pod(Extension(identity): Extension<VerifiedIdentity>) -> Json<IdentityGreeting> {
    tracing::info!(uid = identity.uid(), email = identity.email(), "Pod requested");
    Json(IdentityGreeting { hello: identity })
}
