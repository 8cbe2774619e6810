//! Firebase identity configuration.
//!
//! Follows the `FromEnv` pattern from `core_config`.

use core_config::{ConfigError, FromEnv, env_optional, env_required};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Google's JWK set for Firebase ID token signing keys.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Issuer prefix for Firebase ID tokens; the project id is appended.
pub const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// The subset of a service-account key file the verifier needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    #[serde(default)]
    pub client_email: Option<String>,
}

/// Firebase ID-token verification configuration.
///
/// Loaded from environment variables:
/// - `FIREBASE_KEY_PATH` (required): path to the service-account JSON key
/// - `FIREBASE_PROJECT_ID` (optional): overrides the key file's `project_id`
/// - `FIREBASE_JWKS_URL` (optional): overrides the signing-key endpoint
#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub credentials_path: Option<PathBuf>,
    pub jwks_url: String,
}

impl FirebaseConfig {
    /// Configuration for a known project id, using Google's key endpoint.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            credentials_path: None,
            jwks_url: FIREBASE_JWKS_URL.to_string(),
        }
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    /// Read the project id out of a service-account key file.
    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileError {
            path: display.clone(),
            details: e.to_string(),
        })?;

        let key: ServiceAccountKey =
            serde_json::from_str(&raw).map_err(|e| ConfigError::FileError {
                path: display.clone(),
                details: format!("not a service-account key: {}", e),
            })?;

        if key.project_id.trim().is_empty() {
            return Err(ConfigError::FileError {
                path: display,
                details: "project_id is empty".to_string(),
            });
        }

        Ok(Self {
            credentials_path: Some(path.to_path_buf()),
            ..Self::new(key.project_id)
        })
    }

    /// Expected `iss` claim for this project.
    pub fn issuer(&self) -> String {
        format!("{}{}", FIREBASE_ISSUER_PREFIX, self.project_id)
    }
}

impl FromEnv for FirebaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let path = env_required("FIREBASE_KEY_PATH")?;
        let mut config = Self::from_key_file(path)?;

        if let Some(project_id) = env_optional("FIREBASE_PROJECT_ID") {
            config.project_id = project_id;
        }
        if let Some(url) = env_optional("FIREBASE_JWKS_URL") {
            config = config.with_jwks_url(url);
        }

        Ok(config)
    }
}
