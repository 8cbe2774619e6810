use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, ErrorCode};
use thiserror::Error;

use crate::models::DetailResponse;

pub const CHAIN_UNAVAILABLE_DETAIL: &str = "Couldn't establish QA chain for collection";
pub const QUERY_FAILED_DETAIL: &str = "Couldn't query collection";

#[derive(Debug, Error)]
pub enum PodError {
    #[error("Pod not found: {0}")]
    PodNotFound(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Language model error: {0}")]
    LanguageModel(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Setting up retrieval for a pod failed.
    #[error("Couldn't establish QA chain for collection")]
    ChainUnavailable(#[source] Box<PodError>),

    /// Running retrieval or generation for a question failed.
    #[error("Couldn't query collection")]
    QueryFailed(#[source] Box<PodError>),
}

pub type PodResult<T> = Result<T, PodError>;

impl PodError {
    pub fn chain_unavailable(cause: PodError) -> Self {
        PodError::ChainUnavailable(Box::new(cause))
    }

    pub fn query_failed(cause: PodError) -> Self {
        PodError::QueryFailed(Box::new(cause))
    }
}

impl From<qdrant_client::QdrantError> for PodError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        PodError::Store(err.to_string())
    }
}

impl From<std::io::Error> for PodError {
    fn from(err: std::io::Error) -> Self {
        PodError::Store(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for PodError {
    fn from(err: serde_json::Error) -> Self {
        PodError::Internal(format!("JSON error: {}", err))
    }
}

/// Convert PodError to AppError for standardized HTTP error responses
impl From<PodError> for AppError {
    fn from(err: PodError) -> Self {
        match err {
            PodError::PodNotFound(pod_id) => AppError::NotFound(format!("Pod {} not found", pod_id)),
            PodError::Store(msg) => AppError::upstream(ErrorCode::VectorStoreError, msg),
            PodError::Embedding(msg) => AppError::upstream(ErrorCode::EmbeddingProviderError, msg),
            PodError::LanguageModel(msg) => AppError::upstream(ErrorCode::LanguageModelError, msg),
            PodError::Internal(msg) => AppError::InternalServerError(msg),
            other @ (PodError::ChainUnavailable(_) | PodError::QueryFailed(_)) => {
                AppError::InternalServerError(other.to_string())
            }
        }
    }
}

impl IntoResponse for PodError {
    fn into_response(self) -> Response {
        match self {
            PodError::ChainUnavailable(cause) => {
                tracing::error!(error = %cause, "{}", CHAIN_UNAVAILABLE_DETAIL);
                detail_response(CHAIN_UNAVAILABLE_DETAIL)
            }
            PodError::QueryFailed(cause) => {
                tracing::error!(error = %cause, "{}", QUERY_FAILED_DETAIL);
                detail_response(QUERY_FAILED_DETAIL)
            }
            other => AppError::from(other).into_response(),
        }
    }
}

fn detail_response(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(DetailResponse {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}
