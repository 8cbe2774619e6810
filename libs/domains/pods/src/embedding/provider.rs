use async_trait::async_trait;

use crate::error::PodResult;
use crate::models::EmbeddingModel;

/// Maps text to fixed-length vectors.
///
/// The same provider must be used for documents and queries of a pod.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn model(&self) -> EmbeddingModel;

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> PodResult<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> PodResult<Vec<Vec<f32>>>;
}
