use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::config::OpenAIConfig;
use crate::error::{PodError, PodResult};
use crate::models::EmbeddingModel;

/// OpenAI embeddings client
pub struct OpenAIEmbeddings {
    client: Client,
    api_key: String,
    base_url: String,
    model: EmbeddingModel,
}

impl OpenAIEmbeddings {
    pub fn new(config: &OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.embedding_model,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddings {
    fn model(&self) -> EmbeddingModel {
        self.model
    }

    async fn embed(&self, text: &str) -> PodResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PodError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> PodResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            model: self.model.model_name(),
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PodError::Embedding(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PodError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| PodError::Embedding(format!("Failed to parse response: {}", e)))?;

        // Sort by index to maintain order
        let mut data = embedding_response.data;
        data.sort_by_key(|d| d.index);

        if data.len() != texts.len() {
            return Err(PodError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                data.len()
            )));
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{}", addr)
    }

    fn provider(base_url: String) -> OpenAIEmbeddings {
        OpenAIEmbeddings::new(&OpenAIConfig::new("sk-test").with_base_url(base_url))
    }

    #[tokio::test]
    async fn test_embed_batch_restores_input_order() {
        let router = Router::new().route(
            "/embeddings",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "text-embedding-ada-002");
                assert_eq!(body["input"].as_array().unwrap().len(), 2);
                Json(json!({
                    "data": [
                        {"embedding": [0.0, 1.0], "index": 1},
                        {"embedding": [1.0, 0.0], "index": 0}
                    ],
                    "usage": {"prompt_tokens": 4, "total_tokens": 4}
                }))
            }),
        );
        let base_url = serve(router).await;

        let vectors = provider(base_url)
            .embed_batch(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_provider_error_is_reported() {
        let router = Router::new().route(
            "/embeddings",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
        );
        let base_url = serve(router).await;

        let err = provider(base_url).embed("hello").await.unwrap_err();
        match err {
            PodError::Embedding(msg) => assert!(msg.contains("429")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_model_follows_config() {
        let mut config = OpenAIConfig::new("sk-test");
        config.embedding_model = EmbeddingModel::TextEmbedding3Large;

        let embeddings = OpenAIEmbeddings::new(&config);
        assert_eq!(embeddings.model(), EmbeddingModel::TextEmbedding3Large);
        assert_eq!(embeddings.model().dimension(), 3072);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let vectors = provider("http://127.0.0.1:1".to_string())
            .embed_batch(&[])
            .await
            .unwrap();
        assert!(vectors.is_empty());
    }
}
