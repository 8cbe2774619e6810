//! Retrieval-augmented question answering over a single pod.
//!
//! A [`QaChain`] embeds the question, pulls the closest documents from the
//! pod, "stuffs" them into one prompt and asks the chat model.

use crate::embedding::EmbeddingProvider;
use crate::error::PodResult;
use crate::llm::ChatModel;
use crate::models::{QaAnswer, ScoredDocument, SourceDocument};
use crate::store::PodStore;

/// Build the stuffed prompt from retrieved documents.
pub fn stuff_prompt(documents: &[ScoredDocument], question: &str) -> String {
    let context = documents
        .iter()
        .map(|doc| doc.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
         {context}\n\nQuestion: {question}\nHelpful Answer:"
    )
}

/// Similarity search bound to one pod.
pub struct Retriever<'a> {
    store: &'a dyn PodStore,
    embedder: &'a dyn EmbeddingProvider,
    pod_id: String,
    top_k: usize,
}

impl<'a> Retriever<'a> {
    pub fn new(
        store: &'a dyn PodStore,
        embedder: &'a dyn EmbeddingProvider,
        pod_id: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            pod_id: pod_id.into(),
            top_k,
        }
    }

    pub fn pod_id(&self) -> &str {
        &self.pod_id
    }

    pub async fn retrieve(&self, query: &str) -> PodResult<Vec<ScoredDocument>> {
        let embedding = self.embedder.embed(query).await?;
        self.store.query(&self.pod_id, embedding, self.top_k).await
    }
}

/// "Stuff" QA chain: retrieve, build one prompt, ask the model.
pub struct QaChain<'a> {
    retriever: Retriever<'a>,
    llm: &'a dyn ChatModel,
}

impl<'a> QaChain<'a> {
    pub fn new(retriever: Retriever<'a>, llm: &'a dyn ChatModel) -> Self {
        Self { retriever, llm }
    }

    pub fn pod_id(&self) -> &str {
        self.retriever.pod_id()
    }

    pub async fn run(&self, query: &str) -> PodResult<QaAnswer> {
        let documents = self.retriever.retrieve(query).await?;
        tracing::debug!(
            pod_id = %self.pod_id(),
            retrieved = documents.len(),
            "Retrieved context documents"
        );

        let prompt = stuff_prompt(&documents, query);
        let result = self.llm.complete(&prompt).await?;

        Ok(QaAnswer {
            query: query.to_string(),
            result,
            source_documents: documents.into_iter().map(SourceDocument::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::error::PodError;
    use crate::llm::MockChatModel;
    use crate::store::MockPodStore;
    use uuid::Uuid;

    fn scored(text: &str, score: f32) -> ScoredDocument {
        ScoredDocument {
            id: Uuid::new_v4(),
            text: text.to_string(),
            metadata: None,
            score,
        }
    }

    #[test]
    fn test_stuff_prompt_layout() {
        let prompt = stuff_prompt(
            &[scored("Doc one.", 0.9), scored("Doc two.", 0.8)],
            "What is it?",
        );
        assert!(prompt.starts_with("Use the following pieces of context"));
        assert!(prompt.contains("Doc one.\n\nDoc two."));
        assert!(prompt.ends_with("Question: What is it?\nHelpful Answer:"));
    }

    #[tokio::test]
    async fn test_run_retrieves_top_k_and_cites_sources() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed()
            .withf(|text| text.to_string() == "Where is the key box?")
            .returning(|_| Ok(vec![1.0, 0.0]));

        let mut store = MockPodStore::new();
        store
            .expect_query()
            .withf(|pod_id, embedding, limit| {
                pod_id.to_string() == "house" && embedding == &vec![1.0, 0.0] && *limit == 4
            })
            .returning(|_, _, _| Ok(vec![scored("The key box is underneath the electricity installation.", 0.93)]));

        let mut llm = MockChatModel::new();
        llm.expect_complete()
            .withf(|prompt| prompt.contains("electricity installation"))
            .returning(|_| Ok("Underneath the electricity installation.".to_string()));

        let chain = QaChain::new(Retriever::new(&store, &embedder, "house", 4), &llm);
        let answer = chain.run("Where is the key box?").await.unwrap();

        assert_eq!(answer.query, "Where is the key box?");
        assert_eq!(answer.result, "Underneath the electricity installation.");
        assert_eq!(answer.source_documents.len(), 1);
        assert_eq!(answer.source_documents[0].score, 0.93);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_embed().returning(|_| Ok(vec![1.0]));

        let mut store = MockPodStore::new();
        store.expect_query().returning(|_, _, _| Ok(vec![]));

        let mut llm = MockChatModel::new();
        llm.expect_complete()
            .returning(|_| Err(PodError::LanguageModel("timeout".to_string())));

        let chain = QaChain::new(Retriever::new(&store, &embedder, "house", 4), &llm);
        assert!(matches!(
            chain.run("anything").await,
            Err(PodError::LanguageModel(_))
        ));
    }
}
