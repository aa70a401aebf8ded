//! Reactive navigation guard.
//!
//! [`decide_transition`] is a pure function of the auth snapshot and the
//! current screen. Re-running it on unchanged inputs yields the same answer,
//! and once a redirect lands the target is in the matching whitelist, so a
//! second evaluation is a no-op.

use crate::auth::{AuthPhase, AuthSnapshot};
use crate::ids::UserId;
use crate::navigation::screen::{
    ScreenState, AUTH_ENTRY_SCREEN, FIRST_ONBOARDING_SCREEN, MAIN_APP_SCREEN,
};

/// Decides whether the current screen must be replaced.
///
/// Returns `None` while the session or profile is still resolving, on the
/// splash screen, and inside an active auth flow.
pub fn decide_transition(auth: &AuthSnapshot, current: ScreenState) -> Option<ScreenState> {
    if current == ScreenState::Splash || current.is_auth_flow() {
        return None;
    }

    match auth.phase() {
        AuthPhase::Resolving | AuthPhase::ProfileLoading => None,
        AuthPhase::Ready(profile) if profile.onboarding_completed => {
            (!current.is_completed_user()).then_some(MAIN_APP_SCREEN)
        }
        AuthPhase::Ready(_) => (!current.is_onboarding()).then_some(FIRST_ONBOARDING_SCREEN),
        AuthPhase::SignedOut => current.is_protected().then_some(AUTH_ENTRY_SCREEN),
    }
}

/// The inputs the guard depends on. A watcher re-evaluates only when this
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardInputs {
    pub auth_loading: bool,
    pub is_authenticated: bool,
    pub onboarding_completed: Option<bool>,
    pub user_id: Option<UserId>,
    pub screen: ScreenState,
}

impl GuardInputs {
    pub fn capture(auth: &AuthSnapshot, screen: ScreenState) -> Self {
        Self {
            auth_loading: auth.is_loading,
            is_authenticated: auth.is_authenticated,
            onboarding_completed: auth.profile.as_ref().map(|p| p.onboarding_completed),
            user_id: auth.profile.as_ref().map(|p| p.user_id.clone()),
            screen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserProfile;

    fn completed() -> AuthSnapshot {
        AuthSnapshot::authenticated(Some(UserProfile::new("u1", true)))
    }

    fn onboarding() -> AuthSnapshot {
        AuthSnapshot::authenticated(Some(UserProfile::new("u1", false)))
    }

    #[test]
    fn test_loading_never_transitions() {
        let mut snapshots = vec![AuthSnapshot::loading()];
        let mut loading_with_profile = completed();
        loading_with_profile.is_loading = true;
        snapshots.push(loading_with_profile);
        let mut loading_signed_out = AuthSnapshot::signed_out();
        loading_signed_out.is_loading = true;
        snapshots.push(loading_signed_out);

        for auth in &snapshots {
            for screen in ScreenState::ALL {
                assert_eq!(decide_transition(auth, screen), None, "{screen}");
            }
        }
    }

    #[test]
    fn test_auth_flow_screens_are_never_redirected() {
        let snapshots = [
            AuthSnapshot::signed_out(),
            AuthSnapshot::authenticated(None),
            completed(),
            onboarding(),
        ];
        for auth in &snapshots {
            for screen in ScreenState::ALL.into_iter().filter(|s| s.is_auth_flow()) {
                assert_eq!(decide_transition(auth, screen), None, "{screen}");
            }
        }
    }

    #[test]
    fn test_completed_user_is_sent_to_main_app() {
        assert_eq!(
            decide_transition(&completed(), ScreenState::Gender),
            Some(ScreenState::MainApp)
        );
        assert_eq!(decide_transition(&completed(), ScreenState::Settings), None);
    }

    #[test]
    fn test_incomplete_user_is_sent_to_onboarding() {
        assert_eq!(
            decide_transition(&onboarding(), ScreenState::MainApp),
            Some(ScreenState::CaptureGuidelines)
        );
        assert_eq!(decide_transition(&onboarding(), ScreenState::Budget), None);
    }

    #[test]
    fn test_profile_loading_does_not_guess() {
        let auth = AuthSnapshot::authenticated(None);
        for screen in ScreenState::ALL {
            assert_eq!(decide_transition(&auth, screen), None, "{screen}");
        }
    }

    #[test]
    fn test_signed_out_leaves_protected_screens() {
        let auth = AuthSnapshot::signed_out();
        assert_eq!(
            decide_transition(&auth, ScreenState::MainApp),
            Some(ScreenState::WelcomeAuth)
        );
        assert_eq!(
            decide_transition(&auth, ScreenState::SubmittingOnboarding),
            Some(ScreenState::WelcomeAuth)
        );
        assert_eq!(decide_transition(&auth, ScreenState::Camera), None);
    }

    #[test]
    fn test_redirect_targets_are_fixed_points() {
        let snapshots = [AuthSnapshot::signed_out(), completed(), onboarding()];
        for auth in &snapshots {
            for screen in ScreenState::ALL {
                if let Some(target) = decide_transition(auth, screen) {
                    assert_eq!(decide_transition(auth, target), None, "{screen} -> {target}");
                }
            }
        }
    }

    #[test]
    fn test_inputs_ignore_access_token() {
        let a = GuardInputs::capture(&completed(), ScreenState::MainApp);
        let b = GuardInputs::capture(&completed().with_access_token("t"), ScreenState::MainApp);
        assert_eq!(a, b);
    }
}
