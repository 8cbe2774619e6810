mod openai;
mod provider;

pub use openai::OpenAIEmbeddings;
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
