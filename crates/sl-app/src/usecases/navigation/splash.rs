use std::sync::Arc;

use tokio::time::sleep;
use tracing::{info, info_span, warn, Instrument};

use sl_core::config::SplashTimings;
use sl_core::navigation::{decide_splash_exit, Direction, ScreenState, SplashDecision};
use sl_core::ports::SessionProviderPort;

use crate::usecases::navigation::controller::NavigationController;

/// Cold-start splash: hold for the minimum duration, branch on auth, wait
/// one extension at most, then fail open.
pub struct SplashBootstrap {
    controller: Arc<NavigationController>,
    session: Arc<dyn SessionProviderPort>,
    timings: SplashTimings,
}

impl SplashBootstrap {
    pub fn new(
        controller: Arc<NavigationController>,
        session: Arc<dyn SessionProviderPort>,
        timings: SplashTimings,
    ) -> Self {
        Self {
            controller,
            session,
            timings,
        }
    }

    /// Returns the screen showing once splash has been left (or the current
    /// screen, if something else already moved off splash).
    pub async fn run(&self) -> ScreenState {
        let span = info_span!(
            "usecase.splash_bootstrap.run",
            min_hold_ms = self.timings.min_hold.as_millis() as u64,
            extension_ms = self.timings.extension.as_millis() as u64
        );
        async {
            let session = Arc::clone(&self.session);
            tokio::spawn(
                async move {
                    if let Err(err) = session.initialize().await {
                        warn!(error = %err, "session initialization failed");
                    }
                }
                .in_current_span(),
            );

            sleep(self.timings.min_hold).await;
            let mut decision = decide_splash_exit(&self.session.current(), false);
            if decision == SplashDecision::Extend {
                info!("auth still resolving, extending splash once");
                sleep(self.timings.extension).await;
                decision = decide_splash_exit(&self.session.current(), true);
            }

            let SplashDecision::Proceed(target) = decision else {
                // decide_splash_exit never extends twice.
                return self.controller.current_screen().await;
            };

            info!(to = ?target, "leaving splash");
            if !self
                .controller
                .transition_from(ScreenState::Splash, target, Direction::Replace)
                .await
            {
                info!("screen already left splash");
            }
            self.controller.current_screen().await
        }
        .instrument(span)
        .await
    }
}
