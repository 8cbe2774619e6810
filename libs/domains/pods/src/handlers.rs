use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_helpers::errors::responses::{InternalServerErrorResponse, NotFoundResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::PodResult;
use crate::models::{
    DeleteResponse, DetailResponse, QaAnswer, QueryParams, QueryResponse, SeedResponse,
    SourceDocument,
};
use crate::service::PodService;
use crate::store::PodStore;

pub const TAG: &str = "Pods";

/// OpenAPI documentation for the pod endpoints
#[derive(OpenApi)]
#[openapi(
    paths(seed_pod, delete_pod, query_pod),
    components(
        schemas(SeedResponse, DeleteResponse, QueryResponse, QaAnswer, SourceDocument, DetailResponse),
        responses(NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Seed, delete and query pod document collections")
    )
)]
pub struct ApiDoc;

/// Create the pod router with all HTTP endpoints
pub fn router<S: PodStore + 'static>(service: Arc<PodService<S>>) -> Router {
    Router::new()
        .route("/seed/{pod_id}", post(seed_pod::<S>).delete(delete_pod::<S>))
        .route("/query/{pod_id}", get(query_pod::<S>))
        .with_state(service)
}

/// Load the seed documents into a pod
#[utoipa::path(
    post,
    path = "/seed/{pod_id}",
    tag = TAG,
    params(
        ("pod_id" = String, Path, description = "Pod identifier")
    ),
    responses(
        (status = 200, description = "Seed documents loaded", body = SeedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn seed_pod<S: PodStore>(
    State(service): State<Arc<PodService<S>>>,
    Path(pod_id): Path<String>,
) -> PodResult<Json<SeedResponse>> {
    Ok(Json(service.seed_pod(&pod_id).await?))
}

/// Delete a pod and all its documents
#[utoipa::path(
    delete,
    path = "/seed/{pod_id}",
    tag = TAG,
    params(
        ("pod_id" = String, Path, description = "Pod identifier")
    ),
    responses(
        (status = 200, description = "Pod deleted", body = DeleteResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_pod<S: PodStore>(
    State(service): State<Arc<PodService<S>>>,
    Path(pod_id): Path<String>,
) -> PodResult<Json<DeleteResponse>> {
    Ok(Json(service.delete_pod(&pod_id).await?))
}

/// Answer a question from a pod's documents
#[utoipa::path(
    get,
    path = "/query/{pod_id}",
    tag = TAG,
    params(
        ("pod_id" = String, Path, description = "Pod identifier"),
        QueryParams
    ),
    responses(
        (status = 200, description = "Answer with source documents", body = QueryResponse),
        (status = 500, description = "QA chain could not be built or run", body = DetailResponse)
    )
)]
async fn query_pod<S: PodStore>(
    State(service): State<Arc<PodService<S>>>,
    Path(pod_id): Path<String>,
    Query(params): Query<QueryParams>,
) -> PodResult<Json<QueryResponse>> {
    Ok(Json(service.ask(&pod_id, &params.q).await?))
}
