//! Pod storage backends.
//!
//! A pod maps to one collection of embedded documents. [`LocalPodStore`]
//! keeps collections on disk under `DATA_DIR`; [`QdrantPodStore`] keeps them
//! in a Qdrant server.

mod local;
mod qdrant;

pub use local::{LocalPodStore, cosine_similarity};
pub use qdrant::QdrantPodStore;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::PodResult;
use crate::models::{EmbeddedDocument, ScoredDocument};

/// Persistence for pod collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PodStore: Send + Sync {
    /// Create the pod's collection unless it already exists.
    async fn get_or_create(&self, pod_id: &str) -> PodResult<()>;

    async fn exists(&self, pod_id: &str) -> PodResult<bool>;

    /// Remove the pod and all its documents. Returns false if it did not exist.
    async fn delete(&self, pod_id: &str) -> PodResult<bool>;

    /// Number of documents stored in the pod.
    async fn count(&self, pod_id: &str) -> PodResult<u64>;

    /// Append documents to an existing pod.
    async fn add(&self, pod_id: &str, documents: Vec<EmbeddedDocument>) -> PodResult<Vec<Uuid>>;

    /// The `limit` documents closest to `embedding`, best match first.
    async fn query(
        &self,
        pod_id: &str,
        embedding: Vec<f32>,
        limit: usize,
    ) -> PodResult<Vec<ScoredDocument>>;

    async fn health_check(&self) -> PodResult<()>;
}

#[async_trait]
impl<T: PodStore + ?Sized> PodStore for Arc<T> {
    async fn get_or_create(&self, pod_id: &str) -> PodResult<()> {
        (**self).get_or_create(pod_id).await
    }

    async fn exists(&self, pod_id: &str) -> PodResult<bool> {
        (**self).exists(pod_id).await
    }

    async fn delete(&self, pod_id: &str) -> PodResult<bool> {
        (**self).delete(pod_id).await
    }

    async fn count(&self, pod_id: &str) -> PodResult<u64> {
        (**self).count(pod_id).await
    }

    async fn add(&self, pod_id: &str, documents: Vec<EmbeddedDocument>) -> PodResult<Vec<Uuid>> {
        (**self).add(pod_id, documents).await
    }

    async fn query(
        &self,
        pod_id: &str,
        embedding: Vec<f32>,
        limit: usize,
    ) -> PodResult<Vec<ScoredDocument>> {
        (**self).query(pod_id, embedding, limit).await
    }

    async fn health_check(&self) -> PodResult<()> {
        (**self).health_check().await
    }
}
