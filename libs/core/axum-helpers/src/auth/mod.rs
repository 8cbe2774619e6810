//! Identity verification for protected routes.
//!
//! Callers present a Firebase ID token as `Authorization: Bearer <token>`.
//! [`require_identity`] verifies it through an [`IdentityVerifier`] and makes
//! the resulting [`VerifiedIdentity`] available as a request extension.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{FirebaseConfig, FirebaseVerifier, SharedVerifier, require_identity};
//! use core_config::FromEnv;
//!
//! let verifier: SharedVerifier = Arc::new(FirebaseVerifier::new(FirebaseConfig::from_env()?));
//!
//! let protected = Router::new()
//!     .route("/pod", post(handler))
//!     .layer(axum::middleware::from_fn_with_state(verifier, require_identity));
//! ```

pub mod config;
pub mod firebase;
pub mod identity;
pub mod middleware;

pub use config::FirebaseConfig;
pub use firebase::FirebaseVerifier;
pub use identity::{AuthError, IdentityVerifier, VerifiedIdentity};
pub use middleware::{SharedVerifier, extract_bearer_token, require_identity};
