//! Bearer-token session provider.
//!
//! The token comes from configuration (or a previous sign-in) and the profile
//! from `GET /profile`. Snapshots are published on a `watch` channel so the
//! guard watcher reacts to every change.

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, info_span, warn, Instrument};

use sl_core::analysis::ApiError;
use sl_core::auth::{AuthSnapshot, UserProfile};
use sl_core::ports::SessionProviderPort;

use crate::http::ProfileApi;

pub struct TokenSessionProvider {
    profile_api: ProfileApi,
    tx: watch::Sender<AuthSnapshot>,
}

impl TokenSessionProvider {
    /// Starts in the loading state until [`SessionProviderPort::initialize`] runs.
    pub fn new(profile_api: ProfileApi) -> Self {
        let (tx, _) = watch::channel(AuthSnapshot::loading());
        Self { profile_api, tx }
    }

    fn publish(&self, snapshot: AuthSnapshot) {
        self.tx.send_replace(snapshot);
    }

    fn signed_in(&self, token: String, profile: Option<UserProfile>) -> AuthSnapshot {
        AuthSnapshot::authenticated(profile).with_access_token(token)
    }

    /// Loads the profile for `token`. Rejected tokens end the session; other
    /// failures leave the profile pending.
    async fn load_profile(&self, token: String) -> anyhow::Result<()> {
        match self.profile_api.fetch_profile().await {
            Ok(profile) => {
                info!(
                    user_id = %profile.user_id,
                    onboarding_completed = profile.onboarding_completed,
                    "profile loaded"
                );
                self.publish(self.signed_in(token, Some(profile)));
                Ok(())
            }
            Err(err) if is_rejected(&err) => {
                warn!(error = %err, "token rejected, signing out");
                self.profile_api.client().token().set(None);
                self.publish(AuthSnapshot::signed_out());
                Ok(())
            }
            Err(err) => Err(anyhow!(err).context("load profile")),
        }
    }
}

fn is_rejected(err: &ApiError) -> bool {
    matches!(err, ApiError::Status { code: 401 | 403, .. })
}

#[async_trait]
impl SessionProviderPort for TokenSessionProvider {
    async fn initialize(&self) -> anyhow::Result<()> {
        async {
            let Some(token) = self.profile_api.client().token().get() else {
                info!("no stored token, session is signed out");
                self.publish(AuthSnapshot::signed_out());
                return Ok(());
            };
            self.publish(self.signed_in(token.clone(), None));
            self.load_profile(token).await
        }
        .instrument(info_span!("infra.session.initialize"))
        .await
    }

    fn current(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    async fn refresh_profile(&self) -> anyhow::Result<()> {
        let Some(token) = self.profile_api.client().token().get() else {
            return Ok(());
        };
        self.load_profile(token)
            .instrument(info_span!("infra.session.refresh_profile"))
            .await
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        self.profile_api.client().token().set(None);
        self.publish(AuthSnapshot::signed_out());
        info!("signed out");
        Ok(())
    }
}
