use async_trait::async_trait;

use crate::analysis::ApiError;
use crate::onboarding::OnboardingSubmission;

#[async_trait]
pub trait OnboardingApiPort: Send + Sync {
    /// `POST /onboarding`. Called once at the end of the funnel.
    async fn submit(&self, submission: &OnboardingSubmission) -> Result<(), ApiError>;
}
