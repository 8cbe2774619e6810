use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Built-in documents loaded by the seed endpoint.
pub const SEED_TEXTS: [&str; 4] = [
    "When your are coming from the driveway and facing the building, the key box is found on the right facade of the building. This is also the facade where the covered terrace is. The key box is underneath the electricity installation.",
    "To turn on the shower you first need to open the valve located under the kitchen sink.",
    "A thermostat under the kitchen sink controls the water temperature in the outdoor shower.",
    "Before you use the toilet make sure that there is a plastic bag in the bucket. Open the toilet (not the lid, but the lower opening) to check the bucket.",
];

/// A document ready to be stored: text, metadata and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedDocument {
    pub id: Uuid,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub embedding: Vec<f32>,
}

impl EmbeddedDocument {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            metadata: None,
            embedding,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A stored document returned by a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: Uuid,
    pub text: String,
    pub metadata: Option<serde_json::Value>,
    pub score: f32,
}

/// Context document cited by an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SourceDocument {
    pub id: Uuid,
    pub page_content: String,
    pub metadata: Option<serde_json::Value>,
    pub score: f32,
}

impl From<ScoredDocument> for SourceDocument {
    fn from(doc: ScoredDocument) -> Self {
        Self {
            id: doc.id,
            page_content: doc.text,
            metadata: doc.metadata,
            score: doc.score,
        }
    }
}

/// Output of a QA chain run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QaAnswer {
    pub query: String,
    pub result: String,
    pub source_documents: Vec<SourceDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeedResponse {
    pub msg: String,
    pub doc_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub msg: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct QueryParams {
    /// Question to answer from the pod's documents
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    pub pod_id: String,
    pub result: QaAnswer,
}

/// Fixed-message error body used by the query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetailResponse {
    pub detail: String,
}

/// OpenAI embedding models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmbeddingModel {
    /// text-embedding-ada-002 (1536 dimensions)
    #[default]
    TextEmbeddingAda002,
    /// text-embedding-3-small (1536 dimensions)
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    TextEmbedding3Large,
}

impl EmbeddingModel {
    pub fn dimension(&self) -> u64 {
        match self {
            EmbeddingModel::TextEmbeddingAda002 => 1536,
            EmbeddingModel::TextEmbedding3Small => 1536,
            EmbeddingModel::TextEmbedding3Large => 3072,
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::TextEmbeddingAda002 => "text-embedding-ada-002",
            EmbeddingModel::TextEmbedding3Small => "text-embedding-3-small",
            EmbeddingModel::TextEmbedding3Large => "text-embedding-3-large",
        }
    }
}

impl FromStr for EmbeddingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-embedding-ada-002" => Ok(EmbeddingModel::TextEmbeddingAda002),
            "text-embedding-3-small" => Ok(EmbeddingModel::TextEmbedding3Small),
            "text-embedding-3-large" => Ok(EmbeddingModel::TextEmbedding3Large),
            other => Err(format!("unknown embedding model {}", other)),
        }
    }
}
