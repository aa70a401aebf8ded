use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use sl_core::analysis::ApiError;
use sl_core::onboarding::{OnboardingSubmission, UserData};
use sl_core::ports::OnboardingApiPort;

#[derive(Debug, thiserror::Error)]
pub enum SubmitOnboardingError {
    #[error("onboarding submission failed: {0}")]
    Api(#[from] ApiError),
}

/// Use case for submitting the onboarding answers.
///
/// Posts the accumulator once at the end of the funnel. The analysis is
/// referenced by id, not embedded.
pub struct SubmitOnboarding {
    api: Arc<dyn OnboardingApiPort>,
}

impl SubmitOnboarding {
    pub fn new(api: Arc<dyn OnboardingApiPort>) -> Self {
        Self { api }
    }

    pub async fn execute(&self, data: &UserData) -> Result<(), SubmitOnboardingError> {
        let submission = OnboardingSubmission::from(data);
        let span = info_span!(
            "usecase.submit_onboarding.execute",
            analysis_id = submission.analysis_id.as_ref().map(|id| id.as_str()).unwrap_or("")
        );
        async {
            self.api.submit(&submission).await?;
            info!("onboarding submitted");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
