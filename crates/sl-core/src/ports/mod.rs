//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `sl-app` and the
//! adapters in `sl-infra` (or the screen layer, for the presenter). The core
//! never depends on a concrete transport, image codec or auth store.

mod analysis_api;
mod cache;
mod compressor;
mod onboarding_api;
mod presenter;
mod progress;
mod session;

#[cfg(any(test, feature = "mocks"))]
pub mod tests;

pub use analysis_api::{AnalysisApiPort, UploadProgress};
pub use cache::AnalysisCachePort;
pub use compressor::ImageCompressorPort;
pub use onboarding_api::OnboardingApiPort;
pub use presenter::ScreenPresenterPort;
pub use progress::{NoopWorkflowProgress, WorkflowProgressPort};
pub use session::SessionProviderPort;
