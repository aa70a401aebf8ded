//! Mock implementations of the ports for testing.
//!
//! Built with `mockall`, available to this crate's tests and, through the
//! `mocks` feature, to downstream crates' tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::watch;

use crate::analysis::{
    Analysis, AnalysisStatus, AnalysisStatusReport, ApiError, UploadReceipt, WorkflowProgress,
};
use crate::auth::AuthSnapshot;
use crate::config::CompressionPreset;
use crate::ids::AnalysisId;
use crate::navigation::{Direction, ScreenState};
use crate::onboarding::OnboardingSubmission;
use crate::ports::{
    AnalysisApiPort, AnalysisCachePort, ImageCompressorPort, OnboardingApiPort,
    ScreenPresenterPort, SessionProviderPort, UploadProgress, WorkflowProgressPort,
};

mock! {
    pub AnalysisApi {}

    #[async_trait]
    impl AnalysisApiPort for AnalysisApi {
        async fn upload(&self, image: &Path, progress: UploadProgress)
            -> Result<UploadReceipt, ApiError>;
        async fn status(&self, id: &AnalysisId) -> Result<AnalysisStatusReport, ApiError>;
        async fn fetch(&self, id: &AnalysisId) -> Result<Analysis, ApiError>;
        async fn latest(&self) -> Result<Option<Analysis>, ApiError>;
    }
}

mock! {
    pub OnboardingApi {}

    #[async_trait]
    impl OnboardingApiPort for OnboardingApi {
        async fn submit(&self, submission: &OnboardingSubmission) -> Result<(), ApiError>;
    }
}

mock! {
    pub Session {}

    #[async_trait]
    impl SessionProviderPort for Session {
        async fn initialize(&self) -> anyhow::Result<()>;
        fn current(&self) -> AuthSnapshot;
        fn subscribe(&self) -> watch::Receiver<AuthSnapshot>;
        async fn refresh_profile(&self) -> anyhow::Result<()>;
        async fn sign_out(&self) -> anyhow::Result<()>;
    }
}

mock! {
    pub Compressor {}

    #[async_trait]
    impl ImageCompressorPort for Compressor {
        async fn compress(&self, source: &Path, preset: &CompressionPreset)
            -> anyhow::Result<PathBuf>;
    }
}

mock! {
    pub AnalysisCache {}

    #[async_trait]
    impl AnalysisCachePort for AnalysisCache {
        async fn put(&self, analysis: &Analysis) -> anyhow::Result<()>;
        async fn get(&self, id: &AnalysisId) -> anyhow::Result<Option<Analysis>>;
        async fn update_status(
            &self,
            id: &AnalysisId,
            status: AnalysisStatus,
            error_message: Option<String>,
        ) -> anyhow::Result<()>;
    }
}

mock! {
    pub Progress {}

    impl WorkflowProgressPort for Progress {
        fn report(&self, progress: WorkflowProgress);
    }
}

mock! {
    pub Presenter {}

    #[async_trait]
    impl ScreenPresenterPort for Presenter {
        async fn present(&self, from: ScreenState, to: ScreenState, direction: Direction);
        fn show_progress(&self, progress: WorkflowProgress);
    }
}
