use async_trait::async_trait;

use crate::analysis::{Analysis, AnalysisStatus};
use crate::ids::AnalysisId;

/// Optimistic local copy of analyses.
///
/// Writes only mirror state the backend already reported.
#[async_trait]
pub trait AnalysisCachePort: Send + Sync {
    async fn put(&self, analysis: &Analysis) -> anyhow::Result<()>;

    async fn get(&self, id: &AnalysisId) -> anyhow::Result<Option<Analysis>>;

    /// Updates status/error of a cached record. Unknown ids are ignored.
    async fn update_status(
        &self,
        id: &AnalysisId,
        status: AnalysisStatus,
        error_message: Option<String>,
    ) -> anyhow::Result<()>;
}
