mod openai;

pub use openai::OpenAIChatModel;

use async_trait::async_trait;

use crate::error::PodResult;

/// Text-generation model used to answer questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete a single-turn prompt and return the model's reply.
    async fn complete(&self, prompt: &str) -> PodResult<String>;
}
