//! Analysis workflow orchestrator.
//!
//! Drives one captured image through compress → upload → poll → validate and
//! resolves to either a terminal [`Analysis`] or a classified
//! [`AnalysisError`]. Stages run strictly in order. The orchestrator never
//! touches navigation state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use sl_core::analysis::progress::{
    processing_percent, upload_percent, COMPRESS_DONE_PERCENT, UPLOAD_END_PERCENT,
    UPLOAD_START_PERCENT,
};
use sl_core::analysis::{
    inspect_analysis, Analysis, AnalysisError, AnalysisStatus, ApiError, ProgressTracker,
    ValidationReport, WorkflowStage,
};
use sl_core::config::{CompressionPreset, PollingPolicy, UploadPolicy};
use sl_core::ids::AnalysisId;
use sl_core::ports::{
    AnalysisApiPort, AnalysisCachePort, ImageCompressorPort, UploadProgress,
    WorkflowProgressPort,
};

/// Terminal analysis plus the diagnostic validation result.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub analysis: Analysis,
    pub validation: ValidationReport,
}

/// Fans progress out to the sink through a monotonic tracker. Shared with
/// the upload callback, which may fire from the adapter's own task.
#[derive(Clone)]
struct ProgressReporter {
    tracker: Arc<Mutex<ProgressTracker>>,
    sink: Arc<dyn WorkflowProgressPort>,
}

impl ProgressReporter {
    fn new(sink: Arc<dyn WorkflowProgressPort>) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(ProgressTracker::new())),
            sink,
        }
    }

    fn report(&self, stage: WorkflowStage, percent: u8) {
        let progress = {
            let mut tracker = self
                .tracker
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            tracker.advance(stage, percent)
        };
        self.sink.report(progress);
    }

    fn last_percent(&self) -> u8 {
        self.tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last_percent()
    }
}

/// Use case running the analysis workflow.
pub struct AnalysisWorkflow {
    api: Arc<dyn AnalysisApiPort>,
    compressor: Arc<dyn ImageCompressorPort>,
    cache: Option<Arc<dyn AnalysisCachePort>>,
    polling: PollingPolicy,
    upload_policy: UploadPolicy,
    compression: CompressionPreset,
}

impl AnalysisWorkflow {
    pub fn new(api: Arc<dyn AnalysisApiPort>, compressor: Arc<dyn ImageCompressorPort>) -> Self {
        Self {
            api,
            compressor,
            cache: None,
            polling: PollingPolicy::default(),
            upload_policy: UploadPolicy::default(),
            compression: CompressionPreset::default(),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn AnalysisCachePort>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_policies(
        mut self,
        polling: PollingPolicy,
        upload: UploadPolicy,
        compression: CompressionPreset,
    ) -> Self {
        self.polling = polling;
        self.upload_policy = upload;
        self.compression = compression;
        self
    }

    /// Runs the workflow and returns the terminal analysis.
    ///
    /// Fallback-looking results still resolve `Ok`; see [`Self::run_with_report`]
    /// for the validation details.
    pub async fn run(
        &self,
        image: &Path,
        progress: Arc<dyn WorkflowProgressPort>,
        cancel: &CancellationToken,
    ) -> Result<Analysis, AnalysisError> {
        self.run_with_report(image, progress, cancel)
            .await
            .map(|outcome| outcome.analysis)
    }

    pub async fn run_with_report(
        &self,
        image: &Path,
        progress: Arc<dyn WorkflowProgressPort>,
        cancel: &CancellationToken,
    ) -> Result<WorkflowOutcome, AnalysisError> {
        let span = info_span!("usecase.analysis_workflow.run", image = %image.display());
        let reporter = ProgressReporter::new(progress);

        let result = self
            .execute(image, &reporter, cancel)
            .instrument(span.clone())
            .await;

        let _entered = span.enter();
        match &result {
            Ok(outcome) => {
                info!(analysis_id = %outcome.analysis.id, "analysis workflow completed");
            }
            Err(AnalysisError::Cancelled) => {
                info!("analysis workflow cancelled");
            }
            Err(err) => {
                warn!(tag = err.tag().as_str(), error = %err, "analysis workflow failed");
                reporter.report(WorkflowStage::Failed, reporter.last_percent());
            }
        }
        result
    }

    async fn execute(
        &self,
        image: &Path,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<WorkflowOutcome, AnalysisError> {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        let (upload_path, compressed) = self.compress(image, reporter).await;
        let uploaded = self.upload(&upload_path, reporter, cancel).await;
        if compressed {
            if let Err(err) = tokio::fs::remove_file(&upload_path).await {
                debug!(path = %upload_path.display(), error = %err, "failed to remove compressed copy");
            }
        }
        let analysis_id = uploaded?;

        self.poll(&analysis_id, reporter, cancel).await
    }

    /// Best-effort: any failure falls back to the original image.
    async fn compress(&self, image: &Path, reporter: &ProgressReporter) -> (PathBuf, bool) {
        reporter.report(WorkflowStage::Compressing, 0);
        let result = match self.compressor.compress(image, &self.compression).await {
            Ok(path) => (path, true),
            Err(err) => {
                warn!(error = %err, "image compression failed, uploading original");
                (image.to_path_buf(), false)
            }
        };
        reporter.report(WorkflowStage::Compressing, COMPRESS_DONE_PERCENT);
        result
    }

    async fn upload(
        &self,
        path: &Path,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<AnalysisId, AnalysisError> {
        reporter.report(WorkflowStage::Uploading, UPLOAD_START_PERCENT);

        let callback_reporter = reporter.clone();
        let on_progress: UploadProgress = Arc::new(move |percent| {
            callback_reporter.report(WorkflowStage::Uploading, upload_percent(percent));
        });

        let request = timeout(self.upload_policy.timeout, self.api.upload(path, on_progress));
        let receipt = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
            result = request => match result {
                Err(_) => {
                    return Err(AnalysisError::network(format!(
                        "upload timed out after {:?}",
                        self.upload_policy.timeout
                    )))
                }
                Ok(Err(err)) => return Err(err.classify(None)),
                Ok(Ok(receipt)) => receipt,
            },
        };

        info!(
            analysis_id = %receipt.analysis_id,
            status = receipt.status.as_str(),
            task_id = receipt.task_id.as_deref().unwrap_or(""),
            "image uploaded"
        );
        reporter.report(WorkflowStage::Uploading, UPLOAD_END_PERCENT);

        if receipt.status == AnalysisStatus::Failed {
            return Err(AnalysisError::AnalysisFailed {
                analysis_id: Some(receipt.analysis_id),
                message: receipt
                    .message
                    .unwrap_or_else(|| "analysis rejected on upload".to_string()),
            });
        }

        self.cache_put(&Analysis::processing(receipt.analysis_id.clone(), Utc::now()))
            .await;
        Ok(receipt.analysis_id)
    }

    async fn poll(
        &self,
        id: &AnalysisId,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<WorkflowOutcome, AnalysisError> {
        let max_attempts = self.polling.max_attempts;
        let mut transient_failures = 0u32;

        for attempt in 1..=max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
                _ = sleep(self.polling.interval) => {}
            }

            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
                result = self.api.status(id) => result,
            };

            let report = match status {
                Ok(report) => report,
                Err(err) => {
                    self.absorb_transient(id, err, attempt, &mut transient_failures)?;
                    continue;
                }
            };
            transient_failures = 0;
            debug!(analysis_id = %id, attempt, status = report.status.as_str(), "analysis status");

            match report.status {
                AnalysisStatus::Processing => {
                    reporter.report(
                        WorkflowStage::Processing,
                        processing_percent(report.progress, attempt, max_attempts),
                    );
                }
                AnalysisStatus::Failed => {
                    return Err(self.failed(id, report.error_message).await);
                }
                AnalysisStatus::Completed => {
                    let fetched = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
                        result = self.api.fetch(id) => result,
                    };
                    let analysis = match fetched {
                        Ok(analysis) => analysis,
                        Err(err) => {
                            self.absorb_transient(id, err, attempt, &mut transient_failures)?;
                            continue;
                        }
                    };

                    match analysis.status {
                        // Record lags behind the status endpoint; keep polling.
                        AnalysisStatus::Processing => continue,
                        AnalysisStatus::Failed => {
                            return Err(self.failed(id, analysis.error_message).await);
                        }
                        AnalysisStatus::Completed => {
                            let outcome = self.complete(analysis).await;
                            reporter.report(WorkflowStage::Completed, 100);
                            return Ok(outcome);
                        }
                    }
                }
            }
        }

        Err(AnalysisError::Timeout {
            analysis_id: id.clone(),
            attempts: max_attempts,
        })
    }

    /// Counts a poll-side failure against the transient budget. Returns the
    /// classified error once the budget is spent or the failure is permanent.
    fn absorb_transient(
        &self,
        id: &AnalysisId,
        err: ApiError,
        attempt: u32,
        transient_failures: &mut u32,
    ) -> Result<(), AnalysisError> {
        if !err.is_transient() {
            return Err(err.classify(Some(id)));
        }
        *transient_failures += 1;
        if *transient_failures > self.polling.max_transient_retries {
            return Err(err.classify(Some(id)));
        }
        warn!(
            analysis_id = %id,
            attempt,
            failures = *transient_failures,
            error = %err,
            "transient status failure, retrying"
        );
        Ok(())
    }

    async fn failed(&self, id: &AnalysisId, message: Option<String>) -> AnalysisError {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache
                .update_status(id, AnalysisStatus::Failed, message.clone())
                .await
            {
                warn!(analysis_id = %id, error = %err, "failed to update cached analysis");
            }
        }
        AnalysisError::AnalysisFailed {
            analysis_id: Some(id.clone()),
            message: message.unwrap_or_else(|| "analysis failed".to_string()),
        }
    }

    async fn complete(&self, analysis: Analysis) -> WorkflowOutcome {
        let validation = inspect_analysis(&analysis);
        if validation.looks_like_fallback() {
            let degraded = AnalysisError::BackendDegraded {
                analysis_id: analysis.id.clone(),
                signals: validation.signals().to_vec(),
            };
            warn!(
                tag = degraded.tag().as_str(),
                analysis_id = %analysis.id,
                signals = ?validation.signals(),
                "{degraded}; returning it anyway"
            );
        }
        self.cache_put(&analysis).await;
        WorkflowOutcome {
            analysis,
            validation,
        }
    }

    async fn cache_put(&self, analysis: &Analysis) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.put(analysis).await {
                warn!(analysis_id = %analysis.id, error = %err, "failed to cache analysis");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use mockall::predicate::eq;
    use sl_core::analysis::{AnalysisStatusReport, ErrorTag, UploadReceipt, WorkflowProgress};
    use sl_core::config::AppConfig;
    use sl_core::ports::tests::mock_ports::{MockAnalysisApi, MockCompressor};

    use super::*;

    #[derive(Default)]
    struct RecordingProgress {
        seen: StdMutex<Vec<WorkflowProgress>>,
    }

    impl WorkflowProgressPort for RecordingProgress {
        fn report(&self, progress: WorkflowProgress) {
            self.seen.lock().unwrap().push(progress);
        }
    }

    fn receipt(id: &str) -> UploadReceipt {
        UploadReceipt {
            analysis_id: AnalysisId::new(id),
            status: AnalysisStatus::Processing,
            task_id: Some("task-1".into()),
            message: None,
        }
    }

    fn status(status: AnalysisStatus) -> AnalysisStatusReport {
        AnalysisStatusReport {
            status,
            progress: None,
            error_message: None,
        }
    }

    fn failing_compressor() -> MockCompressor {
        let mut compressor = MockCompressor::new();
        compressor
            .expect_compress()
            .returning(|_, _| Err(anyhow::anyhow!("unsupported format")));
        compressor
    }

    fn workflow(api: MockAnalysisApi) -> AnalysisWorkflow {
        AnalysisWorkflow::new(Arc::new(api), Arc::new(failing_compressor()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_terminates_without_retrying() {
        let mut api = MockAnalysisApi::new();
        api.expect_upload().returning(|_, _| Ok(receipt("A404")));
        api.expect_status()
            .with(eq(AnalysisId::new("A404")))
            .times(1)
            .returning(|_| Err(ApiError::NotFound));

        let err = workflow(api)
            .run(
                Path::new("/tmp/face.jpg"),
                Arc::new(RecordingProgress::default()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.tag(), ErrorTag::NotFoundError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_errors_retry_up_to_bound() {
        let mut api = MockAnalysisApi::new();
        api.expect_upload().returning(|_, _| Ok(receipt("A1")));
        // One initial failure plus three retries.
        api.expect_status()
            .times(4)
            .returning(|_| Err(ApiError::Network("connection reset".into())));

        let err = workflow(api)
            .run(
                Path::new("/tmp/face.jpg"),
                Arc::new(RecordingProgress::default()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.tag(), ErrorTag::NetworkError);
        assert!(err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_budget_resets_after_success() {
        let mut api = MockAnalysisApi::new();
        api.expect_upload().returning(|_, _| Ok(receipt("A1")));
        let calls = Arc::new(StdMutex::new(0u32));
        let counter = calls.clone();
        api.expect_status().returning(move |_| {
            let mut n = counter.lock().unwrap();
            *n += 1;
            match *n {
                1..=3 | 5..=7 => Err(ApiError::Timeout),
                4 => Ok(status(AnalysisStatus::Processing)),
                _ => Ok(status(AnalysisStatus::Failed)),
            }
        });

        let err = workflow(api)
            .run(
                Path::new("/tmp/face.jpg"),
                Arc::new(RecordingProgress::default()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.tag(), ErrorTag::AnalysisFailedError);
        assert_eq!(*calls.lock().unwrap(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_status_surfaces_backend_message() {
        let mut api = MockAnalysisApi::new();
        api.expect_upload().returning(|_, _| Ok(receipt("A1")));
        api.expect_status().returning(|_| {
            Ok(AnalysisStatusReport {
                status: AnalysisStatus::Failed,
                progress: None,
                error_message: Some("no face detected".into()),
            })
        });

        let err = workflow(api)
            .run(
                Path::new("/tmp/face.jpg"),
                Arc::new(RecordingProgress::default()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::AnalysisFailed {
                analysis_id: Some(AnalysisId::new("A1")),
                message: "no face detected".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_attempts_time_out() {
        let mut api = MockAnalysisApi::new();
        api.expect_upload().returning(|_, _| Ok(receipt("A1")));
        api.expect_status()
            .times(5)
            .returning(|_| Ok(status(AnalysisStatus::Processing)));

        let polling = PollingPolicy {
            interval: Duration::from_secs(3),
            max_attempts: 5,
            max_transient_retries: 3,
        };
        let err = workflow(api)
            .with_policies(polling, UploadPolicy::default(), CompressionPreset::default())
            .run(
                Path::new("/tmp/face.jpg"),
                Arc::new(RecordingProgress::default()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::Timeout {
                analysis_id: AnalysisId::new("A1"),
                attempts: 5
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_timeout_on_upload_is_a_network_error() {
        let mut api = MockAnalysisApi::new();
        api.expect_upload().returning(|_, _| Err(ApiError::Timeout));

        let err = workflow(api)
            .run(
                Path::new("/tmp/face.jpg"),
                Arc::new(RecordingProgress::default()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.tag(), ErrorTag::NetworkError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_transient_budget_fails_on_first_blip() {
        let mut api = MockAnalysisApi::new();
        api.expect_upload().returning(|_, _| Ok(receipt("A1")));
        api.expect_status()
            .times(1)
            .returning(|_| Err(ApiError::Timeout));

        let polling = PollingPolicy::from_config(&AppConfig {
            polling_max_transient_retries: Some(0),
            ..AppConfig::empty()
        });
        let err = workflow(api)
            .with_policies(polling, UploadPolicy::default(), CompressionPreset::default())
            .run(
                Path::new("/tmp/face.jpg"),
                Arc::new(RecordingProgress::default()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.tag(), ErrorTag::NetworkError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start() {
        let api = MockAnalysisApi::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = workflow(api)
            .run(
                Path::new("/tmp/face.jpg"),
                Arc::new(RecordingProgress::default()),
                &cancel,
            )
            .await
            .unwrap_err();

        assert_eq!(err, AnalysisError::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compression_failure_uploads_original() {
        let mut api = MockAnalysisApi::new();
        api.expect_upload()
            .withf(|path, _| path.to_str() == Some("/tmp/original.jpg"))
            .times(1)
            .returning(|_, _| Err(ApiError::Status {
                code: 400,
                message: "bad image".into(),
            }));

        let progress = Arc::new(RecordingProgress::default());
        let err = workflow(api)
            .run(
                Path::new("/tmp/original.jpg"),
                progress.clone(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.tag(), ErrorTag::AnalysisFailedError);
        let seen = progress.seen.lock().unwrap();
        assert_eq!(seen.last().unwrap().stage, WorkflowStage::Failed);
    }
}
