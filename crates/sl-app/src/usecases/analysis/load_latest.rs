use std::sync::Arc;

use tracing::{info_span, warn, Instrument};

use sl_core::analysis::{inspect_analysis, Analysis, AnalysisError};
use sl_core::ports::{AnalysisApiPort, AnalysisCachePort};

/// Use case for loading the user's most recent analysis.
///
/// Validation is diagnostic only, the same as in the workflow.
pub struct LoadLatestAnalysis {
    api: Arc<dyn AnalysisApiPort>,
    cache: Option<Arc<dyn AnalysisCachePort>>,
}

impl LoadLatestAnalysis {
    pub fn new(api: Arc<dyn AnalysisApiPort>, cache: Option<Arc<dyn AnalysisCachePort>>) -> Self {
        Self { api, cache }
    }

    /// Returns `None` when the user has no analysis yet.
    pub async fn execute(&self) -> Result<Option<Analysis>, AnalysisError> {
        let span = info_span!("usecase.load_latest_analysis.execute");
        async {
            let Some(analysis) = self.api.latest().await.map_err(|e| e.classify(None))? else {
                return Ok(None);
            };

            let report = inspect_analysis(&analysis);
            if report.looks_like_fallback() {
                warn!(
                    analysis_id = %analysis.id,
                    signals = ?report.signals(),
                    "latest analysis looks like fallback data"
                );
            }

            if let Some(cache) = &self.cache {
                if let Err(err) = cache.put(&analysis).await {
                    warn!(analysis_id = %analysis.id, error = %err, "failed to cache analysis");
                }
            }
            Ok(Some(analysis))
        }
        .instrument(span)
        .await
    }
}
