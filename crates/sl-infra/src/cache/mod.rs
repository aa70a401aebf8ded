use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use sl_core::analysis::{Analysis, AnalysisStatus};
use sl_core::ids::AnalysisId;
use sl_core::ports::AnalysisCachePort;

/// Process-local analysis cache.
#[derive(Default)]
pub struct InMemoryAnalysisCache {
    entries: RwLock<HashMap<AnalysisId, Analysis>>,
}

impl InMemoryAnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisCachePort for InMemoryAnalysisCache {
    async fn put(&self, analysis: &Analysis) -> anyhow::Result<()> {
        debug!(analysis_id = %analysis.id, status = analysis.status.as_str(), "cache put");
        self.entries
            .write()
            .await
            .insert(analysis.id.clone(), analysis.clone());
        Ok(())
    }

    async fn get(&self, id: &AnalysisId) -> anyhow::Result<Option<Analysis>> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &AnalysisId,
        status: AnalysisStatus,
        error_message: Option<String>,
    ) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(id) {
            Some(entry) => {
                entry.status = status;
                if error_message.is_some() {
                    entry.error_message = error_message;
                }
            }
            None => debug!(analysis_id = %id, "status update for uncached analysis ignored"),
        }
        Ok(())
    }
}
