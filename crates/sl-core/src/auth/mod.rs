//! Authentication snapshot as observed by the navigation layer.
//!
//! The session provider owns these values. Navigation only reads them and never
//! writes back; see [`crate::ports::SessionProviderPort`].

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Backend user profile.
///
/// 后端用户资料。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub onboarding_completed: bool,
}

/// Point-in-time view of the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub profile: Option<UserProfile>,
    /// Bearer token for API calls. Not part of any navigation decision.
    pub access_token: Option<String>,
}

/// Resolution phase derived from an [`AuthSnapshot`].
///
/// `ProfileLoading` (authenticated, no profile yet) is intentionally distinct
/// from `SignedOut`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase<'a> {
    Resolving,
    SignedOut,
    ProfileLoading,
    Ready(&'a UserProfile),
}

impl AuthSnapshot {
    /// Provider has not resolved the session yet.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Authenticated session; `profile` may still be `None` while it loads.
    pub fn authenticated(profile: Option<UserProfile>) -> Self {
        Self {
            is_loading: false,
            is_authenticated: true,
            profile,
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn phase(&self) -> AuthPhase<'_> {
        if self.is_loading {
            return AuthPhase::Resolving;
        }
        match (self.is_authenticated, self.profile.as_ref()) {
            (false, _) => AuthPhase::SignedOut,
            (true, None) => AuthPhase::ProfileLoading,
            (true, Some(profile)) => AuthPhase::Ready(profile),
        }
    }

    /// Whether the snapshot is still settling (auth loading or profile pending).
    pub fn is_resolving(&self) -> bool {
        matches!(
            self.phase(),
            AuthPhase::Resolving | AuthPhase::ProfileLoading
        )
    }
}

impl UserProfile {
    pub fn new(user_id: impl Into<UserId>, onboarding_completed: bool) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            onboarding_completed,
        }
    }
}
