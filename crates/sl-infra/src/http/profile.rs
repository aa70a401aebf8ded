use sl_core::analysis::ApiError;
use sl_core::auth::UserProfile;

use super::client::ApiClient;

/// `GET /profile` for the session provider.
#[derive(Clone)]
pub struct ProfileApi {
    client: ApiClient,
}

impl ProfileApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.client.get_json("profile").await
    }
}
