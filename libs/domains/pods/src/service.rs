use std::sync::Arc;

use tracing::instrument;

use crate::config::DEFAULT_TOP_K;
use crate::embedding::EmbeddingProvider;
use crate::error::{PodError, PodResult};
use crate::llm::ChatModel;
use crate::models::{
    DeleteResponse, EmbeddedDocument, QueryResponse, SEED_TEXTS, SeedResponse,
};
use crate::qa::{QaChain, Retriever};
use crate::store::PodStore;

/// Pod operations: seeding, deletion and question answering.
pub struct PodService<S: PodStore> {
    store: S,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn ChatModel>,
    top_k: usize,
}

impl<S: PodStore> PodService<S> {
    pub fn new(store: S, embedder: Arc<dyn EmbeddingProvider>, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            store,
            embedder,
            llm,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Load the built-in documents into the pod, creating it if needed.
    ///
    /// Every call adds four new documents; nothing is deduplicated.
    #[instrument(skip_all, fields(pod_id = %pod_id))]
    pub async fn seed_pod(&self, pod_id: &str) -> PodResult<SeedResponse> {
        self.store.get_or_create(pod_id).await?;
        let before = self.store.count(pod_id).await?;
        tracing::info!(doc_count = before, "Pod document count before seeding");

        let texts: Vec<String> = SEED_TEXTS.iter().map(|t| t.to_string()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let documents: Vec<EmbeddedDocument> = texts
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| EmbeddedDocument::new(text, embedding))
            .collect();

        self.store.add(pod_id, documents).await?;

        let doc_count = self.store.count(pod_id).await?;
        tracing::info!(doc_count, "Pod document count after seeding");

        Ok(SeedResponse {
            msg: format!("Loaded seed documents in collection {}", pod_id),
            doc_count,
        })
    }

    #[instrument(skip_all, fields(pod_id = %pod_id))]
    pub async fn delete_pod(&self, pod_id: &str) -> PodResult<DeleteResponse> {
        if !self.store.delete(pod_id).await? {
            return Err(PodError::PodNotFound(pod_id.to_string()));
        }

        tracing::info!("Deleted pod");
        Ok(DeleteResponse {
            msg: format!("Deleted collection {}", pod_id),
        })
    }

    /// QA chain bound to an existing pod.
    pub async fn qa_chain(&self, pod_id: &str) -> PodResult<QaChain<'_>> {
        if !self.store.exists(pod_id).await? {
            return Err(PodError::PodNotFound(pod_id.to_string()));
        }

        let retriever = Retriever::new(&self.store, self.embedder.as_ref(), pod_id, self.top_k);
        Ok(QaChain::new(retriever, self.llm.as_ref()))
    }

    /// Answer `question` from the pod's documents.
    ///
    /// Failures collapse into [`PodError::ChainUnavailable`] when the chain
    /// cannot be built and [`PodError::QueryFailed`] when running it fails.
    #[instrument(skip_all, fields(pod_id = %pod_id))]
    pub async fn ask(&self, pod_id: &str, question: &str) -> PodResult<QueryResponse> {
        let chain = self
            .qa_chain(pod_id)
            .await
            .map_err(PodError::chain_unavailable)?;

        let result = chain.run(question).await.map_err(PodError::query_failed)?;

        Ok(QueryResponse {
            pod_id: pod_id.to_string(),
            result,
        })
    }

    pub async fn health_check(&self) -> PodResult<()> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::llm::MockChatModel;
    use crate::models::ScoredDocument;
    use crate::store::MockPodStore;
    use mockall::Sequence;
    use uuid::Uuid;

    fn embedder() -> MockEmbeddingProvider {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed_batch()
            .returning(|texts| Ok(texts.iter().map(|_| vec![0.5, 0.5]).collect()));
        embedder.expect_embed().returning(|_| Ok(vec![0.5, 0.5]));
        embedder
    }

    fn service(store: MockPodStore, llm: MockChatModel) -> PodService<MockPodStore> {
        PodService::new(store, Arc::new(embedder()), Arc::new(llm))
    }

    #[tokio::test]
    async fn test_seed_pod_adds_four_documents() {
        let mut store = MockPodStore::new();
        let mut seq = Sequence::new();

        store
            .expect_get_or_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_count()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(0));
        store
            .expect_add()
            .withf(|pod_id, docs| {
                pod_id.to_string() == "house"
                    && docs.len() == 4
                    && docs[1].text == SEED_TEXTS[1]
                    && docs.iter().all(|d| d.embedding.len() == 2)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, docs| Ok(docs.iter().map(|d| d.id).collect()));
        store
            .expect_count()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(4));

        let response = service(store, MockChatModel::new())
            .seed_pod("house")
            .await
            .unwrap();

        assert_eq!(response.doc_count, 4);
        assert_eq!(response.msg, "Loaded seed documents in collection house");
    }

    #[tokio::test]
    async fn test_seed_pod_propagates_embedding_failure() {
        let mut store = MockPodStore::new();
        store.expect_get_or_create().returning(|_| Ok(()));
        store.expect_count().returning(|_| Ok(0));
        store.expect_add().never();

        let mut failing = MockEmbeddingProvider::new();
        failing
            .expect_embed_batch()
            .returning(|_| Err(PodError::Embedding("quota".to_string())));

        let service = PodService::new(store, Arc::new(failing), Arc::new(MockChatModel::new()));
        assert!(matches!(
            service.seed_pod("house").await,
            Err(PodError::Embedding(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_pod_is_not_found() {
        let mut store = MockPodStore::new();
        store.expect_delete().returning(|_| Ok(false));

        let err = service(store, MockChatModel::new())
            .delete_pod("ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, PodError::PodNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_delete_pod_message() {
        let mut store = MockPodStore::new();
        store.expect_delete().returning(|_| Ok(true));

        let response = service(store, MockChatModel::new())
            .delete_pod("house")
            .await
            .unwrap();
        assert_eq!(response.msg, "Deleted collection house");
    }

    #[tokio::test]
    async fn test_ask_missing_pod_is_chain_unavailable() {
        let mut store = MockPodStore::new();
        store.expect_exists().returning(|_| Ok(false));
        store.expect_query().never();

        let err = service(store, MockChatModel::new())
            .ask("ghost", "anything?")
            .await
            .unwrap_err();
        assert!(matches!(err, PodError::ChainUnavailable(_)));
    }

    #[tokio::test]
    async fn test_ask_store_outage_is_chain_unavailable() {
        let mut store = MockPodStore::new();
        store
            .expect_exists()
            .returning(|_| Err(PodError::Store("connection refused".to_string())));

        let err = service(store, MockChatModel::new())
            .ask("house", "anything?")
            .await
            .unwrap_err();
        assert!(matches!(err, PodError::ChainUnavailable(_)));
    }

    #[tokio::test]
    async fn test_ask_model_failure_is_query_failed() {
        let mut store = MockPodStore::new();
        store.expect_exists().returning(|_| Ok(true));
        store.expect_query().returning(|_, _, _| Ok(vec![]));

        let mut llm = MockChatModel::new();
        llm.expect_complete()
            .returning(|_| Err(PodError::LanguageModel("500".to_string())));

        let err = service(store, llm).ask("house", "anything?").await.unwrap_err();
        assert!(matches!(err, PodError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_ask_returns_answer_for_pod() {
        let mut store = MockPodStore::new();
        store.expect_exists().returning(|_| Ok(true));
        store
            .expect_query()
            .withf(|_, _, limit| *limit == 2)
            .returning(|_, _, _| {
                Ok(vec![ScoredDocument {
                    id: Uuid::new_v4(),
                    text: SEED_TEXTS[1].to_string(),
                    metadata: None,
                    score: 0.88,
                }])
            });

        let mut llm = MockChatModel::new();
        llm.expect_complete()
            .returning(|_| Ok("Open the valve under the kitchen sink.".to_string()));

        let response = service(store, llm)
            .with_top_k(2)
            .ask("house", "How do I turn on the shower?")
            .await
            .unwrap();

        assert_eq!(response.pod_id, "house");
        assert_eq!(response.result.result, "Open the valve under the kitchen sink.");
        assert_eq!(response.result.source_documents[0].page_content, SEED_TEXTS[1]);
    }
}
