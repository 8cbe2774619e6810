use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::PodStore;
use crate::error::{PodError, PodResult};
use crate::models::{EmbeddedDocument, ScoredDocument};

const POD_FILE_EXTENSION: &str = "json";

/// On-disk layout of one pod.
#[derive(Debug, Serialize, Deserialize)]
struct PodFile {
    pod_id: String,
    documents: Vec<EmbeddedDocument>,
}

/// File-backed store: one JSON file per pod under a root directory.
///
/// Every pod is held in memory and searched by brute-force cosine
/// similarity. Writes go to a temporary file that is renamed over the old
/// one, all under a single write lock.
pub struct LocalPodStore {
    root: PathBuf,
    pods: RwLock<HashMap<String, Vec<EmbeddedDocument>>>,
}

impl LocalPodStore {
    /// Open (creating if needed) the store at `root` and load every pod in it.
    pub async fn open(root: impl Into<PathBuf>) -> PodResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        let mut pods = HashMap::new();
        let mut entries = tokio::fs::read_dir(&root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(POD_FILE_EXTENSION) {
                continue;
            }

            let raw = tokio::fs::read(&path).await?;
            let file: PodFile = serde_json::from_slice(&raw).map_err(|e| {
                PodError::Store(format!("Corrupt pod file {}: {}", path.display(), e))
            })?;
            pods.insert(file.pod_id, file.documents);
        }

        tracing::info!(root = %root.display(), pods = pods.len(), "Local pod store opened");

        Ok(Self {
            root,
            pods: RwLock::new(pods),
        })
    }

    /// Pod ids are percent-encoded so they can never escape the root.
    fn pod_path(&self, pod_id: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", urlencoding::encode(pod_id), POD_FILE_EXTENSION))
    }

    async fn persist(&self, pod_id: &str, documents: &[EmbeddedDocument]) -> PodResult<()> {
        let path = self.pod_path(pod_id);
        let tmp = path.with_extension("tmp");

        let file = PodFile {
            pod_id: pod_id.to_string(),
            documents: documents.to_vec(),
        };
        tokio::fs::write(&tmp, serde_json::to_vec(&file)?).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(())
    }
}

#[async_trait]
impl PodStore for LocalPodStore {
    async fn get_or_create(&self, pod_id: &str) -> PodResult<()> {
        let mut pods = self.pods.write().await;
        if pods.contains_key(pod_id) {
            return Ok(());
        }

        self.persist(pod_id, &[]).await?;
        pods.insert(pod_id.to_string(), Vec::new());
        tracing::debug!(pod_id, "Created pod");
        Ok(())
    }

    async fn exists(&self, pod_id: &str) -> PodResult<bool> {
        Ok(self.pods.read().await.contains_key(pod_id))
    }

    async fn delete(&self, pod_id: &str) -> PodResult<bool> {
        let mut pods = self.pods.write().await;
        if !pods.contains_key(pod_id) {
            return Ok(false);
        }

        // The pod stays loaded if its file cannot be removed
        match tokio::fs::remove_file(self.pod_path(pod_id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        pods.remove(pod_id);
        Ok(true)
    }

    async fn count(&self, pod_id: &str) -> PodResult<u64> {
        self.pods
            .read()
            .await
            .get(pod_id)
            .map(|docs| docs.len() as u64)
            .ok_or_else(|| PodError::PodNotFound(pod_id.to_string()))
    }

    async fn add(&self, pod_id: &str, documents: Vec<EmbeddedDocument>) -> PodResult<Vec<Uuid>> {
        let mut pods = self.pods.write().await;
        let existing = pods
            .get(pod_id)
            .ok_or_else(|| PodError::PodNotFound(pod_id.to_string()))?;

        let ids: Vec<Uuid> = documents.iter().map(|d| d.id).collect();
        let mut updated = existing.clone();
        updated.extend(documents);

        // Memory only changes once the file is written
        self.persist(pod_id, &updated).await?;
        pods.insert(pod_id.to_string(), updated);

        Ok(ids)
    }

    async fn query(
        &self,
        pod_id: &str,
        embedding: Vec<f32>,
        limit: usize,
    ) -> PodResult<Vec<ScoredDocument>> {
        let pods = self.pods.read().await;
        let documents = pods
            .get(pod_id)
            .ok_or_else(|| PodError::PodNotFound(pod_id.to_string()))?;

        let mut scored: Vec<ScoredDocument> = documents
            .iter()
            .map(|doc| ScoredDocument {
                id: doc.id,
                text: doc.text.clone(),
                metadata: doc.metadata.clone(),
                score: cosine_similarity(&embedding, &doc.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn health_check(&self) -> PodResult<()> {
        let metadata = tokio::fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(PodError::Store(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }
}

/// Cosine similarity of two vectors; 0.0 for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
