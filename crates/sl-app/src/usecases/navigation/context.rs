use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use sl_core::navigation::ScreenState;
use sl_core::onboarding::UserData;

/// Shared navigation context: current screen, accumulator and in-flight flag.
///
/// The controller is the single writer. Everything else reads snapshots.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `screen` first, then `user_data`.
pub struct NavigationContext {
    screen: Mutex<ScreenState>,
    user_data: Mutex<UserData>,
    /// Serializes transitions. Raised from the screen write until the
    /// presenter finishes; concurrent transitions are dropped, not queued.
    in_flight: AtomicBool,
    /// Screen after the last transition fully settled.
    settled: watch::Sender<ScreenState>,
    /// Bumped every time the flag is released, including for ignored events
    /// that never moved the screen.
    idle: watch::Sender<u64>,
}

impl NavigationContext {
    pub fn new(initial: ScreenState) -> Self {
        let (settled, _) = watch::channel(initial);
        let (idle, _) = watch::channel(0);
        Self {
            screen: Mutex::new(initial),
            user_data: Mutex::new(UserData::default()),
            in_flight: AtomicBool::new(false),
            settled,
            idle,
        }
    }

    /// Returns the context wrapped in Arc for shared ownership.
    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn screen(&self) -> ScreenState {
        *self.screen.lock().await
    }

    pub async fn user_data(&self) -> UserData {
        self.user_data.lock().await.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Notified every time a transition settles.
    pub fn subscribe_settled(&self) -> watch::Receiver<ScreenState> {
        self.settled.subscribe()
    }

    /// Notified every time the in-flight flag is released.
    pub fn subscribe_idle(&self) -> watch::Receiver<u64> {
        self.idle.subscribe()
    }

    /// Raises the in-flight flag. `None` if a transition is already running.
    pub(crate) fn begin_transition(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(InFlight {
            context: self,
            settled_on: None,
        })
    }

    pub(crate) fn screen_lock(&self) -> &Mutex<ScreenState> {
        &self.screen
    }

    pub(crate) fn user_data_lock(&self) -> &Mutex<UserData> {
        &self.user_data
    }
}

/// Guard for a running transition. Dropping it clears the flag, publishes
/// the settled screen if one was recorded, then bumps the idle generation.
pub(crate) struct InFlight<'a> {
    context: &'a NavigationContext,
    settled_on: Option<ScreenState>,
}

impl InFlight<'_> {
    pub(crate) fn settle_on(&mut self, screen: ScreenState) {
        self.settled_on = Some(screen);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.context.in_flight.store(false, Ordering::Release);
        if let Some(screen) = self.settled_on {
            self.context.settled.send_replace(screen);
        }
        self.context
            .idle
            .send_modify(|generation| *generation = generation.wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_transition_is_refused_while_first_is_held() {
        let context = NavigationContext::new(ScreenState::Splash);

        let first = context.begin_transition();
        assert!(first.is_some());
        assert!(context.begin_transition().is_none());

        drop(first);
        assert!(context.begin_transition().is_some());
    }

    #[tokio::test]
    async fn test_settled_is_published_after_flag_clears() {
        let context = NavigationContext::new(ScreenState::Splash);
        let mut settled = context.subscribe_settled();

        {
            let mut guard = context.begin_transition().unwrap();
            guard.settle_on(ScreenState::MainApp);
            assert!(!settled.has_changed().unwrap());
        }

        assert!(settled.has_changed().unwrap());
        assert_eq!(*settled.borrow_and_update(), ScreenState::MainApp);
        assert!(!context.is_in_flight());
    }

    #[tokio::test]
    async fn test_releasing_without_settling_still_signals_idle() {
        let context = NavigationContext::new(ScreenState::Analyzing);
        let mut settled = context.subscribe_settled();
        let mut idle = context.subscribe_idle();

        drop(context.begin_transition().unwrap());

        assert!(!settled.has_changed().unwrap());
        assert!(idle.has_changed().unwrap());
        assert_eq!(*idle.borrow_and_update(), 1);
        assert!(context.begin_transition().is_some());
    }
}
