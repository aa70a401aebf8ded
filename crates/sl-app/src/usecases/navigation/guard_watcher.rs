use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};

use sl_core::navigation::GuardInputs;
use sl_core::ports::SessionProviderPort;

use crate::usecases::navigation::controller::{GuardOutcome, NavigationController};

/// Re-runs the reactive guard whenever its inputs change.
///
/// Inputs are the auth snapshot and the current screen. An evaluation that
/// was deferred by an in-flight transition is retried as soon as the flag is
/// released, whether or not that transition moved the screen.
pub struct GuardWatcher {
    controller: Arc<NavigationController>,
    session: Arc<dyn SessionProviderPort>,
}

impl GuardWatcher {
    pub fn new(
        controller: Arc<NavigationController>,
        session: Arc<dyn SessionProviderPort>,
    ) -> Self {
        Self {
            controller,
            session,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(
            async move { self.run(cancel).await }.instrument(info_span!("usecase.guard_watcher")),
        )
    }

    pub async fn run(&self, cancel: CancellationToken) {
        let mut auth_rx = self.session.subscribe();
        let mut idle_rx = self.controller.context().subscribe_idle();
        let mut last: Option<GuardInputs> = None;

        loop {
            let inputs = GuardInputs::capture(
                &self.session.current(),
                self.controller.current_screen().await,
            );
            if last.as_ref() != Some(&inputs) {
                let outcome = self.controller.evaluate_guard().await;
                debug!(?inputs, ?outcome, "guard evaluated");
                if outcome != GuardOutcome::Deferred {
                    last = Some(inputs);
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = auth_rx.changed() => {
                    if changed.is_err() {
                        debug!("session channel closed, guard watcher stopping");
                        break;
                    }
                }
                changed = idle_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }
}
