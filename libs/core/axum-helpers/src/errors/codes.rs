//! Type-safe error codes for API responses.
//!
//! Each code carries a client-facing identifier (e.g. `"NOT_FOUND"`), an
//! integer for logs and dashboards (e.g. `1004`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.as_str(), "NOT_FOUND");
//! assert_eq!(code.code(), 1004);
//! assert_eq!(code.default_message(), "Resource not found");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Requested resource was not found
    NotFound,

    /// Authentication credentials are missing or invalid
    Unauthorized,

    /// An unexpected internal server error occurred
    InternalError,

    // Upstream errors (2000-2999)
    /// The vector store rejected or failed an operation
    VectorStoreError,

    /// The embedding provider failed
    EmbeddingProviderError,

    /// The text-generation provider failed
    LanguageModelError,

    /// The identity provider could not be reached
    IdentityProviderError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::VectorStoreError => "VECTOR_STORE_ERROR",
            Self::EmbeddingProviderError => "EMBEDDING_PROVIDER_ERROR",
            Self::LanguageModelError => "LANGUAGE_MODEL_ERROR",
            Self::IdentityProviderError => "IDENTITY_PROVIDER_ERROR",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// Ranges:
    /// - 1000-1999: client errors
    /// - 2000-2999: upstream service errors
    pub fn code(&self) -> i32 {
        match self {
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,

            Self::VectorStoreError => 2001,
            Self::EmbeddingProviderError => 2002,
            Self::LanguageModelError => 2003,
            Self::IdentityProviderError => 2004,
        }
    }

    /// Default user-facing message; handlers may override it.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::InternalError => "An internal server error occurred",
            Self::VectorStoreError => "Vector store operation failed",
            Self::EmbeddingProviderError => "Embedding provider request failed",
            Self::LanguageModelError => "Language model request failed",
            Self::IdentityProviderError => "Identity provider is unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
