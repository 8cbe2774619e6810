use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, CountPointsBuilder, CreateCollectionBuilder, Distance, PointId, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use uuid::Uuid;

use super::PodStore;
use crate::config::QdrantConfig;
use crate::error::{PodError, PodResult};
use crate::models::{EmbeddedDocument, ScoredDocument};

/// Payload key holding the document text.
const DOCUMENT_KEY: &str = "document";
/// Payload key holding the document metadata, JSON-encoded.
const METADATA_KEY: &str = "metadata";

/// Qdrant-backed pod store: one collection per pod, named after the
/// percent-encoded pod id.
pub struct QdrantPodStore {
    client: Qdrant,
    dimension: u64,
}

impl QdrantPodStore {
    /// `dimension` is the embedding size used when a pod's collection is created.
    pub fn new(config: &QdrantConfig, dimension: u64) -> PodResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| PodError::Store(format!("Failed to build client: {}", e)))?;

        tracing::info!(url = %config.url, "Qdrant pod store configured");

        Ok(Self { client, dimension })
    }

    fn uuid_to_point_id(id: Uuid) -> PointId {
        PointId::from(id.to_string())
    }

    fn point_id_to_uuid(point_id: &PointId) -> PodResult<Uuid> {
        match &point_id.point_id_options {
            Some(qdrant::point_id::PointIdOptions::Uuid(uuid_str)) => Uuid::parse_str(uuid_str)
                .map_err(|e| PodError::Internal(format!("Invalid UUID: {}", e))),
            Some(qdrant::point_id::PointIdOptions::Num(num)) => Ok(Uuid::from_u128(*num as u128)),
            None => Err(PodError::Internal("Missing point ID".to_string())),
        }
    }

    fn document_payload(document: &EmbeddedDocument) -> HashMap<String, QdrantValue> {
        let mut payload = HashMap::new();
        payload.insert(
            DOCUMENT_KEY.to_string(),
            QdrantValue::from(document.text.clone()),
        );
        if let Some(metadata) = &document.metadata {
            payload.insert(
                METADATA_KEY.to_string(),
                QdrantValue::from(metadata.to_string()),
            );
        }
        payload
    }

    fn payload_string(payload: &HashMap<String, QdrantValue>, key: &str) -> Option<String> {
        match payload.get(key).and_then(|v| v.kind.as_ref()) {
            Some(qdrant::value::Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Qdrant rejects collection names containing `/` and similar characters.
fn collection_name(pod_id: &str) -> Cow<'_, str> {
    urlencoding::encode(pod_id)
}

#[async_trait]
impl PodStore for QdrantPodStore {
    async fn get_or_create(&self, pod_id: &str) -> PodResult<()> {
        let collection = collection_name(pod_id);
        if self.client.collection_exists(collection.as_ref()).await? {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection.as_ref())
                    .vectors_config(VectorParamsBuilder::new(self.dimension, Distance::Cosine)),
            )
            .await?;

        tracing::debug!(pod_id, dimension = self.dimension, "Created Qdrant collection");
        Ok(())
    }

    async fn exists(&self, pod_id: &str) -> PodResult<bool> {
        Ok(self.client.collection_exists(collection_name(pod_id)).await?)
    }

    async fn delete(&self, pod_id: &str) -> PodResult<bool> {
        let collection = collection_name(pod_id);
        if !self.client.collection_exists(collection.as_ref()).await? {
            return Ok(false);
        }
        self.client.delete_collection(collection.as_ref()).await?;
        Ok(true)
    }

    async fn count(&self, pod_id: &str) -> PodResult<u64> {
        let collection = collection_name(pod_id);
        if !self.client.collection_exists(collection.as_ref()).await? {
            return Err(PodError::PodNotFound(pod_id.to_string()));
        }

        let response = self
            .client
            .count(CountPointsBuilder::new(collection.as_ref()).exact(true))
            .await?;

        Ok(response.result.map(|r| r.count).unwrap_or_default())
    }

    async fn add(&self, pod_id: &str, documents: Vec<EmbeddedDocument>) -> PodResult<Vec<Uuid>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = documents.iter().map(|d| d.id).collect();

        let points: Vec<PointStruct> = documents
            .into_iter()
            .map(|doc| {
                let payload = Self::document_payload(&doc);
                PointStruct::new(Self::uuid_to_point_id(doc.id), doc.embedding, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection_name(pod_id), points).wait(true))
            .await?;

        Ok(ids)
    }

    async fn query(
        &self,
        pod_id: &str,
        embedding: Vec<f32>,
        limit: usize,
    ) -> PodResult<Vec<ScoredDocument>> {
        let collection = collection_name(pod_id);
        if !self.client.collection_exists(collection.as_ref()).await? {
            return Err(PodError::PodNotFound(pod_id.to_string()));
        }

        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection.as_ref(), embedding, limit as u64).with_payload(true),
            )
            .await?;

        results
            .result
            .into_iter()
            .map(|point| {
                let id = point
                    .id
                    .as_ref()
                    .map(Self::point_id_to_uuid)
                    .transpose()?
                    .ok_or_else(|| PodError::Internal("Missing point ID".to_string()))?;

                let text = Self::payload_string(&point.payload, DOCUMENT_KEY).unwrap_or_default();
                let metadata = Self::payload_string(&point.payload, METADATA_KEY)
                    .map(|raw| serde_json::from_str(&raw))
                    .transpose()?;

                Ok(ScoredDocument {
                    id,
                    text,
                    metadata,
                    score: point.score,
                })
            })
            .collect()
    }

    async fn health_check(&self) -> PodResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}
