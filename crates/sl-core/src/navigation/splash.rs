//! Splash exit decision.
//!
//! The splash screen is the only place a timer may stand in for real auth
//! data: after the minimum hold the bootstrap asks [`decide_splash_exit`],
//! waits one extension at most, then fails open.

use crate::auth::{AuthPhase, AuthSnapshot};
use crate::navigation::screen::{ScreenState, MAIN_APP_SCREEN, SPLASH_FALLBACK_SCREEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashDecision {
    /// Leave splash for this screen.
    Proceed(ScreenState),
    /// Auth is still resolving; wait one extension window and ask again.
    Extend,
}

pub fn decide_splash_exit(auth: &AuthSnapshot, extension_used: bool) -> SplashDecision {
    match auth.phase() {
        AuthPhase::Resolving | AuthPhase::ProfileLoading if !extension_used => {
            SplashDecision::Extend
        }
        AuthPhase::Resolving | AuthPhase::ProfileLoading => {
            SplashDecision::Proceed(SPLASH_FALLBACK_SCREEN)
        }
        AuthPhase::Ready(profile) if profile.onboarding_completed => {
            SplashDecision::Proceed(MAIN_APP_SCREEN)
        }
        // New and signed-out users both start onboarding; auth is asked for
        // at the end of the funnel.
        AuthPhase::Ready(_) | AuthPhase::SignedOut => {
            SplashDecision::Proceed(SPLASH_FALLBACK_SCREEN)
        }
    }
}
