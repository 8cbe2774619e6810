//! Pod Domain Library
//!
//! Per-tenant ("pod") document collections with retrieval-augmented question
//! answering on top.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   PodService    │  ← seed / delete / ask
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │    PodStore     │     │ EmbeddingProvider │     │    ChatModel    │
//! │    (trait)      │     │     (trait)       │     │     (trait)     │
//! └────────┬────────┘     └────────┬─────────┘     └────────┬────────┘
//!          │                       │                        │
//! ┌────────▼────────┐     ┌────────▼─────────┐     ┌────────▼────────┐
//! │ LocalPodStore   │     │ OpenAIEmbeddings │     │ OpenAIChatModel │
//! │ QdrantPodStore  │     └──────────────────┘     └─────────────────┘
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_pods::{
//!     LocalPodStore, OpenAIChatModel, OpenAIConfig, OpenAIEmbeddings, PodService,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let openai = OpenAIConfig::new("sk-...");
//! let store = LocalPodStore::open("/data").await?;
//!
//! let service = PodService::new(
//!     store,
//!     Arc::new(OpenAIEmbeddings::new(&openai)),
//!     Arc::new(OpenAIChatModel::new(&openai)),
//! );
//!
//! service.seed_pod("holiday-house").await?;
//! let answer = service.ask("holiday-house", "How do I turn on the shower?").await?;
//! println!("{}", answer.result.result);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod qa;
pub mod service;
pub mod store;

pub use config::{OpenAIConfig, PodsConfig, QdrantConfig, StoreBackend};
pub use embedding::{EmbeddingProvider, OpenAIEmbeddings};
pub use error::{PodError, PodResult};
pub use handlers::ApiDoc;
pub use llm::{ChatModel, OpenAIChatModel};
pub use models::*;
pub use qa::{QaChain, Retriever};
pub use service::PodService;
pub use store::{LocalPodStore, PodStore, QdrantPodStore};
