//! Application state management.
//!
//! One store, one embedding provider and one chat model are built at startup
//! and shared by every request through `Arc`s.

use std::sync::Arc;

use axum_helpers::{FirebaseVerifier, SharedVerifier};
use domain_pods::{
    EmbeddingProvider, LocalPodStore, OpenAIChatModel, OpenAIEmbeddings, PodService, PodStore,
    PodsConfig, QdrantPodStore, StoreBackend,
};
use tracing::info;

/// Pod service over whichever store backend was configured.
pub type Pods = PodService<Arc<dyn PodStore>>;

/// Shared application state.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub pods: Arc<Pods>,
    pub verifier: SharedVerifier,
}

impl AppState {
    pub fn new(pods: Pods, verifier: SharedVerifier) -> Self {
        Self {
            pods: Arc::new(pods),
            verifier,
        }
    }

    /// Build the production clients from configuration.
    pub async fn from_config(config: &crate::config::Config) -> eyre::Result<Self> {
        let embedder = Arc::new(OpenAIEmbeddings::new(&config.pods.openai));
        // Qdrant collections are sized for the embedder's vectors
        let store = open_store(&config.pods, embedder.model().dimension()).await?;
        let llm = Arc::new(OpenAIChatModel::new(&config.pods.openai));

        let pods = PodService::new(store, embedder, llm).with_top_k(config.pods.top_k);
        let verifier: SharedVerifier = Arc::new(FirebaseVerifier::new(config.firebase.clone()));

        Ok(Self::new(pods, verifier))
    }
}

async fn open_store(config: &PodsConfig, dimension: u64) -> eyre::Result<Arc<dyn PodStore>> {
    let store: Arc<dyn PodStore> = match config.backend {
        StoreBackend::Local => {
            info!(data_dir = %config.data_dir.display(), "Using local vector store");
            Arc::new(LocalPodStore::open(config.data_dir.clone()).await?)
        }
        StoreBackend::Qdrant => {
            info!(url = %config.qdrant.url, "Using Qdrant vector store");
            Arc::new(QdrantPodStore::new(&config.qdrant, dimension)?)
        }
    };

    Ok(store)
}
