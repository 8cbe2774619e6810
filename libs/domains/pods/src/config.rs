//! Pod domain configuration.
//!
//! All sections load through [`FromEnv`].

use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or, env_required};
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::EmbeddingModel;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TOP_K: usize = 4;

/// Which vector store backs the pods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// JSON files under `DATA_DIR`
    #[default]
    Local,
    Qdrant,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StoreBackend::Local),
            "qdrant" => Ok(StoreBackend::Qdrant),
            other => Err(ConfigError::ParseError {
                key: "VECTOR_STORE".to_string(),
                details: format!("expected `local` or `qdrant`, got `{}`", other),
            }),
        }
    }
}

/// OpenAI provider settings shared by embeddings and chat.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: EmbeddingModel,
    pub chat_model: String,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            embedding_model: EmbeddingModel::default(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl FromEnv for OpenAIConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let embedding_model = match env_optional("OPENAI_EMBEDDING_MODEL") {
            Some(raw) => raw.parse().map_err(|details| ConfigError::ParseError {
                key: "OPENAI_EMBEDDING_MODEL".to_string(),
                details,
            })?,
            None => EmbeddingModel::default(),
        };

        Ok(Self {
            api_key: env_required("OPENAI_API_KEY")?,
            base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            embedding_model,
            chat_model: env_or_default("OPENAI_CHAT_MODEL", DEFAULT_CHAT_MODEL),
        })
    }
}

/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl FromEnv for QdrantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_or_default("QDRANT_URL", "http://localhost:6334"),
            api_key: env_optional("QDRANT_API_KEY"),
            timeout_secs: env_parse_or("QDRANT_TIMEOUT_SECS", 30)?,
        })
    }
}

/// Everything the pod domain needs at startup.
#[derive(Debug, Clone)]
pub struct PodsConfig {
    pub data_dir: PathBuf,
    pub backend: StoreBackend,
    pub qdrant: QdrantConfig,
    pub openai: OpenAIConfig,
    /// Documents retrieved per question
    pub top_k: usize,
}

impl FromEnv for PodsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = match env_optional("VECTOR_STORE") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::default(),
        };

        let top_k: usize = env_parse_or("QA_TOP_K", DEFAULT_TOP_K)?;
        if top_k == 0 {
            return Err(ConfigError::ParseError {
                key: "QA_TOP_K".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            data_dir: PathBuf::from(env_or_default("DATA_DIR", "/data")),
            backend,
            qdrant: QdrantConfig::from_env()?,
            openai: OpenAIConfig::from_env()?,
            top_k,
        })
    }
}
