//! Firebase ID token verification.
//!
//! Tokens are RS256 JWTs signed by Google. The signing keys are published as a
//! JWK set and rotated regularly; the response's `Cache-Control: max-age`
//! tells us how long a fetched set stays valid.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::config::FirebaseConfig;
use super::identity::{AuthError, IdentityVerifier, VerifiedIdentity};

/// Clock skew tolerated on `exp`, `iat` and `auth_time`.
const LEEWAY_SECS: u64 = 60;

/// Used when Google omits `max-age`.
const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

/// Unknown key ids trigger at most one refetch per interval.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
    expires_at: Option<Instant>,
}

enum KeyLookup {
    Found(DecodingKey),
    Missing,
    Refresh,
}

impl CachedKeys {
    fn is_fresh(&self) -> bool {
        self.expires_at.is_none_or(|at| Instant::now() < at)
    }

    fn lookup(&self, kid: &str) -> KeyLookup {
        if !self.is_fresh() {
            return KeyLookup::Refresh;
        }
        if let Some(key) = self.keys.get(kid) {
            return KeyLookup::Found(key.clone());
        }
        if self.expires_at.is_none() || self.fetched_at.elapsed() < MIN_REFRESH_INTERVAL {
            return KeyLookup::Missing;
        }
        KeyLookup::Refresh
    }
}

/// Verifies Firebase ID tokens for a single project.
pub struct FirebaseVerifier {
    config: FirebaseConfig,
    client: Client,
    keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseVerifier {
    pub fn new(config: FirebaseConfig) -> Self {
        tracing::info!(project_id = %config.project_id, "Firebase identity verifier initialized");
        Self {
            config,
            client: Client::new(),
            keys: RwLock::new(None),
        }
    }

    /// Verifier with a fixed key set that never refreshes.
    pub fn with_static_keys(config: FirebaseConfig, keys: HashMap<String, DecodingKey>) -> Self {
        Self {
            config,
            client: Client::new(),
            keys: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
                expires_at: None,
            })),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = LEEWAY_SECS;
        validation.set_audience(&[self.config.project_id.as_str()]);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);
        validation
    }

    /// Look up `kid`, refreshing the key set when it is stale or lacks the key.
    ///
    /// Refreshes happen under the write lock so concurrent callers share one
    /// fetch.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.keys.read().await;
            match cache.as_ref().map(|cached| cached.lookup(kid)) {
                Some(KeyLookup::Found(key)) => return Ok(key),
                Some(KeyLookup::Missing) => return Err(AuthError::UnknownKey(kid.to_string())),
                Some(KeyLookup::Refresh) | None => {}
            }
        }

        let mut cache = self.keys.write().await;
        // Another caller may have refreshed while we waited
        match cache.as_ref().map(|cached| cached.lookup(kid)) {
            Some(KeyLookup::Found(key)) => return Ok(key),
            Some(KeyLookup::Missing) => return Err(AuthError::UnknownKey(kid.to_string())),
            Some(KeyLookup::Refresh) | None => {}
        }

        let refreshed = self.fetch_keys().await?;
        let key = refreshed.keys.get(kid).cloned();
        *cache = Some(refreshed);

        key.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    async fn fetch_keys(&self) -> Result<CachedKeys, AuthError> {
        tracing::debug!(url = %self.config.jwks_url, "Fetching Firebase signing keys");

        let response = self
            .client
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetch(format!(
                "key endpoint returned {}",
                response.status()
            )));
        }

        let ttl = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_KEY_TTL)
            .max(MIN_REFRESH_INTERVAL);

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("invalid JWK set: {}", e)))?;

        let keys = keys_from_jwk_set(&jwks);
        tracing::info!(count = keys.len(), ttl_secs = ttl.as_secs(), "Firebase signing keys refreshed");

        let fetched_at = Instant::now();
        Ok(CachedKeys {
            keys,
            fetched_at,
            expires_at: Some(fetched_at + ttl),
        })
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AuthError::MalformedToken("missing kid header".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let data = decode::<Map<String, Value>>(token, &key, &self.validation())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        check_not_in_future(&data.claims, "iat")?;
        check_not_in_future(&data.claims, "auth_time")?;

        VerifiedIdentity::from_claims(data.claims)
    }
}

/// Index a JWK set by key id, skipping keys that cannot be used for RS256.
pub fn keys_from_jwk_set(jwks: &JwkSet) -> HashMap<String, DecodingKey> {
    jwks.keys
        .iter()
        .filter_map(|jwk| {
            let kid = jwk.common.key_id.clone()?;
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => Some((kid, key)),
                Err(e) => {
                    tracing::warn!(kid = %kid, "Skipping unusable signing key: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// Extract `max-age` from a `Cache-Control` header value.
fn parse_max_age(header: &str) -> Option<Duration> {
    header.split(',').find_map(|directive| {
        directive
            .trim()
            .strip_prefix("max-age=")
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    })
}

/// Timestamps like `iat` and `auth_time` must not lie in the future.
fn check_not_in_future(claims: &Map<String, Value>, name: &str) -> Result<(), AuthError> {
    let Some(value) = claims.get(name) else {
        return Ok(());
    };

    let ts = value
        .as_i64()
        .ok_or_else(|| AuthError::InvalidToken(format!("{} is not a timestamp", name)))?;

    if ts > Utc::now().timestamp() + LEEWAY_SECS as i64 {
        return Err(AuthError::InvalidToken(format!("{} is in the future", name)));
    }

    Ok(())
}
