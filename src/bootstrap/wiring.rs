//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on `sl-infra` and `sl-app` at the same time.
//! It assembles adapters behind their ports and hands them to the use cases;
//! it makes no decisions of its own.

use std::sync::Arc;

use sl_app::usecases::{
    AnalysisWorkflow, LoadLatestAnalysis, NavigationContext, NavigationController,
    SubmitOnboarding,
};
use sl_core::config::{AppConfig, CompressionPreset, PollingPolicy, UploadPolicy};
use sl_core::navigation::ScreenState;
use sl_core::ports::{
    AnalysisApiPort, AnalysisCachePort, ImageCompressorPort, OnboardingApiPort,
    ScreenPresenterPort, SessionProviderPort,
};
use sl_infra::{
    ApiClient, BearerToken, HttpAnalysisApi, HttpOnboardingApi, InMemoryAnalysisCache,
    JpegImageCompressor, ProfileApi, TokenSessionProvider,
};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("API base URL is not configured ([api] base_url)")]
    MissingApiBaseUrl,

    #[error("HTTP client initialization failed: {0}")]
    HttpClient(String),
}

/// Port implementations shared by every use case.
#[derive(Clone)]
pub struct AppDeps {
    pub config: AppConfig,
    pub analysis_api: Arc<dyn AnalysisApiPort>,
    pub onboarding_api: Arc<dyn OnboardingApiPort>,
    pub session: Arc<dyn SessionProviderPort>,
    pub cache: Arc<dyn AnalysisCachePort>,
    pub compressor: Arc<dyn ImageCompressorPort>,
}

pub fn wire_dependencies(config: &AppConfig) -> WiringResult<AppDeps> {
    if config.api_base_url.is_empty() {
        return Err(WiringError::MissingApiBaseUrl);
    }
    let token = if config.api_access_token.is_empty() {
        None
    } else {
        Some(config.api_access_token.clone())
    };
    let client = ApiClient::new(config.api_base_url.clone(), BearerToken::new(token))
        .map_err(|e| WiringError::HttpClient(format!("{e:#}")))?;

    Ok(AppDeps {
        config: config.clone(),
        analysis_api: Arc::new(HttpAnalysisApi::new(client.clone())),
        onboarding_api: Arc::new(HttpOnboardingApi::new(client.clone())),
        session: Arc::new(TokenSessionProvider::new(ProfileApi::new(client))),
        cache: Arc::new(InMemoryAnalysisCache::new()),
        compressor: Arc::new(JpegImageCompressor::new(
            JpegImageCompressor::default_output_dir(),
        )),
    })
}

impl AppDeps {
    pub fn analysis_workflow(&self) -> AnalysisWorkflow {
        AnalysisWorkflow::new(self.analysis_api.clone(), self.compressor.clone())
            .with_cache(self.cache.clone())
            .with_policies(
                PollingPolicy::from_config(&self.config),
                UploadPolicy::from_config(&self.config),
                CompressionPreset::from_config(&self.config),
            )
    }

    pub fn load_latest_analysis(&self) -> LoadLatestAnalysis {
        LoadLatestAnalysis::new(self.analysis_api.clone(), Some(self.cache.clone()))
    }

    pub fn navigation_controller(
        &self,
        initial: ScreenState,
        presenter: Arc<dyn ScreenPresenterPort>,
    ) -> Arc<NavigationController> {
        Arc::new(NavigationController::new(
            NavigationContext::new(initial).arc(),
            self.session.clone(),
            presenter,
            Arc::new(self.analysis_workflow()),
            Arc::new(SubmitOnboarding::new(self.onboarding_api.clone())),
        ))
    }
}
