use async_trait::async_trait;
use reqwest::Client;

use super::ChatModel;
use crate::config::OpenAIConfig;
use crate::error::{PodError, PodResult};

/// OpenAI chat-completions client
pub struct OpenAIChatModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    pub fn new(config: &OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.chat_model.clone(),
            temperature: 0.0,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    async fn complete(&self, prompt: &str) -> PodResult<String> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": self.temperature
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| PodError::LanguageModel(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PodError::LanguageModel(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PodError::LanguageModel(format!("Failed to parse response: {}", e)))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|content| content.trim().to_string())
            .ok_or_else(|| PodError::LanguageModel("Response contained no message".to_string()))
    }
}
