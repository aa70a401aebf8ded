use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use sl_core::analysis::ApiError;
use sl_core::onboarding::OnboardingSubmission;
use sl_core::ports::OnboardingApiPort;

use super::client::ApiClient;

pub struct HttpOnboardingApi {
    client: ApiClient,
}

impl HttpOnboardingApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OnboardingApiPort for HttpOnboardingApi {
    async fn submit(&self, submission: &OnboardingSubmission) -> Result<(), ApiError> {
        info!(
            analysis_id = ?submission.analysis_id.as_ref().map(|id| id.as_str()),
            "submitting onboarding answers"
        );
        self.client
            .send(
                self.client
                    .request(Method::POST, "onboarding")
                    .json(submission),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use sl_core::ids::AnalysisId;
    use sl_core::onboarding::{Gender, SkinConcern, UserData};

    use super::*;
    use crate::http::BearerToken;

    #[tokio::test]
    async fn submit_posts_answers_with_analysis_reference() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/onboarding")
            .match_body(Matcher::PartialJson(json!({
                "gender": "female",
                "topConcern": "redness",
                "analysis_id": "A1"
            })))
            .with_status(201)
            .create_async()
            .await;

        let data = UserData {
            gender: Some(Gender::Female),
            top_concern: Some(SkinConcern::Redness),
            ..Default::default()
        };
        let mut submission = OnboardingSubmission::from(&data);
        submission.analysis_id = Some(AnalysisId::new("A1"));

        let api = HttpOnboardingApi::new(
            ApiClient::new(server.url(), BearerToken::default()).unwrap(),
        );
        api.submit(&submission).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/onboarding")
            .with_status(500)
            .with_body(r#"{"message":"database unavailable"}"#)
            .create_async()
            .await;

        let api = HttpOnboardingApi::new(
            ApiClient::new(server.url(), BearerToken::default()).unwrap(),
        );
        let err = api
            .submit(&OnboardingSubmission::from(&UserData::default()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                code: 500,
                message: "database unavailable".into()
            }
        );
    }
}
