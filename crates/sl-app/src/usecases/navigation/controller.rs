//! Navigation controller.
//!
//! Owns the current screen and the onboarding accumulator. Explicit events go
//! through the pure [`NavigationStateMachine`]; reactive redirects go through
//! [`decide_transition`]. Side effects (analysis, submission, sign-out) run on
//! a task tracker and report back as follow-up events.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, info_span, warn, Instrument};

use sl_core::analysis::{AnalysisError, WorkflowProgress};
use sl_core::navigation::{
    decide_transition, Direction, NavigationAction, NavigationEvent, NavigationStateMachine,
    ScreenState,
};
use sl_core::onboarding::{SkinConcern, UserData, UserDataPatch};
use sl_core::ports::{ScreenPresenterPort, SessionProviderPort, WorkflowProgressPort};

use crate::usecases::analysis::AnalysisWorkflow;
use crate::usecases::navigation::context::{InFlight, NavigationContext};
use crate::usecases::onboarding::SubmitOnboarding;

/// What happened to a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No transition defined for this event on the current screen.
    Ignored,
    /// Another transition was in flight.
    Dropped,
    Transitioned(ScreenState),
}

/// Result of one guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    NoOp,
    Transitioned(ScreenState),
    /// A redirect is due but a transition was in flight.
    Deferred,
}

/// Forwards workflow progress to the analyzing screen.
struct PresenterProgress(Arc<dyn ScreenPresenterPort>);

impl WorkflowProgressPort for PresenterProgress {
    fn report(&self, progress: WorkflowProgress) {
        self.0.show_progress(progress);
    }
}

struct AnalysisRun {
    id: u64,
    cancel: CancellationToken,
}

pub struct NavigationController {
    context: Arc<NavigationContext>,
    session: Arc<dyn SessionProviderPort>,
    presenter: Arc<dyn ScreenPresenterPort>,
    workflow: Arc<AnalysisWorkflow>,
    submit_onboarding: Arc<SubmitOnboarding>,
    analysis: Mutex<Option<AnalysisRun>>,
    next_run_id: AtomicU64,
    tasks: TaskTracker,
}

impl NavigationController {
    pub fn new(
        context: Arc<NavigationContext>,
        session: Arc<dyn SessionProviderPort>,
        presenter: Arc<dyn ScreenPresenterPort>,
        workflow: Arc<AnalysisWorkflow>,
        submit_onboarding: Arc<SubmitOnboarding>,
    ) -> Self {
        Self {
            context,
            session,
            presenter,
            workflow,
            submit_onboarding,
            analysis: Mutex::new(None),
            next_run_id: AtomicU64::new(1),
            tasks: TaskTracker::new(),
        }
    }

    pub fn context(&self) -> &Arc<NavigationContext> {
        &self.context
    }

    pub async fn current_screen(&self) -> ScreenState {
        self.context.screen().await
    }

    /// Read-only snapshot of the accumulator.
    pub async fn user_data(&self) -> UserData {
        self.context.user_data().await
    }

    /// Transition primitive.
    ///
    /// Returns `false` when another transition is in flight; the request is
    /// dropped, not queued. Callers apply accumulator merges before calling.
    pub async fn transition_to(&self, screen: ScreenState, direction: Direction) -> bool {
        let Some(in_flight) = self.context.begin_transition() else {
            debug!(to = ?screen, "transition dropped, another one is in flight");
            return false;
        };
        let from = {
            let mut current = self.context.screen_lock().lock().await;
            std::mem::replace(&mut *current, screen)
        };
        self.present(in_flight, from, screen, direction).await;
        true
    }

    /// Moves from `from` to `to`, waiting out any transition in flight.
    ///
    /// Returns `false` without presenting if the screen is no longer `from`
    /// by the time the flag is free.
    pub async fn transition_from(
        &self,
        from: ScreenState,
        to: ScreenState,
        direction: Direction,
    ) -> bool {
        let mut idle = self.context.subscribe_idle();
        loop {
            if let Some(in_flight) = self.context.begin_transition() {
                {
                    let mut current = self.context.screen_lock().lock().await;
                    if *current != from {
                        debug!(
                            expected = ?from,
                            actual = ?*current,
                            "screen moved on, not transitioning"
                        );
                        return false;
                    }
                    *current = to;
                }
                self.present(in_flight, from, to, direction).await;
                return true;
            }
            debug!(to = ?to, "transition in flight, waiting for idle");
            if idle.changed().await.is_err() {
                return false;
            }
        }
    }

    /// Applies an explicit event and starts its side effects.
    pub async fn dispatch(self: &Arc<Self>, event: NavigationEvent) -> DispatchOutcome {
        let span = info_span!("usecase.navigation.dispatch", event = ?event);
        async {
            let (outcome, effects) = self.apply(event).await;
            for action in effects {
                self.start_effect(action).await;
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Fire-and-forget variant of [`Self::dispatch`] for the screen layer.
    pub fn trigger(self: &Arc<Self>, event: NavigationEvent) {
        let this = Arc::clone(self);
        self.tasks.spawn(async move {
            this.dispatch(event).await;
        });
    }

    pub fn on_continue(self: &Arc<Self>) {
        self.trigger(NavigationEvent::Continue);
    }

    pub fn on_back(self: &Arc<Self>) {
        self.trigger(NavigationEvent::Back);
    }

    pub fn on_take_picture(self: &Arc<Self>, photo_uri: Option<String>) {
        self.trigger(NavigationEvent::TakePicture { photo_uri });
    }

    pub fn on_photo_confirmed(self: &Arc<Self>) {
        self.trigger(NavigationEvent::PhotoConfirmed);
    }

    pub fn on_retake_photo(self: &Arc<Self>) {
        self.trigger(NavigationEvent::RetakePhoto);
    }

    pub fn on_answer(self: &Arc<Self>, patch: UserDataPatch) {
        self.trigger(NavigationEvent::AnswerSubmitted(patch));
    }

    pub fn on_top_concern_selected(self: &Arc<Self>, concern: SkinConcern) {
        self.trigger(NavigationEvent::TopConcernSelected { concern });
    }

    pub fn on_proceed_anyway(self: &Arc<Self>) {
        self.trigger(NavigationEvent::ProceedAnyway);
    }

    pub fn on_continue_anyway(self: &Arc<Self>) {
        self.trigger(NavigationEvent::ContinueAnyway);
    }

    pub fn on_retry_submission(self: &Arc<Self>) {
        self.trigger(NavigationEvent::RetrySubmission);
    }

    pub fn on_open(self: &Arc<Self>, screen: ScreenState) {
        self.trigger(NavigationEvent::OpenScreen(screen));
    }

    pub fn on_sign_out(self: &Arc<Self>) {
        self.trigger(NavigationEvent::SignOut);
    }

    /// Runs the reactive guard once against the current session snapshot.
    pub async fn evaluate_guard(&self) -> GuardOutcome {
        let auth = self.session.current();
        let screen = self.context.screen().await;
        let Some(target) = decide_transition(&auth, screen) else {
            return GuardOutcome::NoOp;
        };

        info!(from = ?screen, to = ?target, "guard redirect");
        if self.transition_to(target, Direction::Replace).await {
            GuardOutcome::Transitioned(target)
        } else {
            GuardOutcome::Deferred
        }
    }

    /// Waits until every spawned effect has finished.
    pub async fn settle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Cancels a running analysis and waits for outstanding effects.
    pub async fn shutdown(&self) {
        self.cancel_analysis().await;
        self.tasks.close();
        self.tasks.wait().await;
    }

    async fn present(
        &self,
        mut in_flight: InFlight<'_>,
        from: ScreenState,
        to: ScreenState,
        direction: Direction,
    ) {
        info!(from = ?from, to = ?to, direction = ?direction, "screen transition");
        self.presenter.present(from, to, direction).await;
        in_flight.settle_on(to);
    }

    /// State machine step without spawning. Returns the effects to start.
    async fn apply(&self, event: NavigationEvent) -> (DispatchOutcome, Vec<NavigationAction>) {
        let Some(in_flight) = self.context.begin_transition() else {
            debug!("event dropped, a transition is in flight");
            return (DispatchOutcome::Dropped, Vec::new());
        };
        let is_authenticated = self.session.current().is_authenticated;

        let (from, transition) = {
            let mut screen = self.context.screen_lock().lock().await;
            let mut data = self.context.user_data_lock().lock().await;
            let Some(transition) =
                NavigationStateMachine::transition(*screen, event, &data, is_authenticated)
            else {
                return (DispatchOutcome::Ignored, Vec::new());
            };

            // Accumulator changes land before the screen does.
            for action in &transition.actions {
                match action {
                    NavigationAction::MergeUserData(patch) => data.merge(patch.clone()),
                    NavigationAction::ResetUserData => data.reset(),
                    _ => {}
                }
            }
            let from = std::mem::replace(&mut *screen, transition.to);
            (from, transition)
        };

        let to = transition.to;
        self.present(in_flight, from, to, transition.direction).await;

        let effects = transition
            .actions
            .into_iter()
            .filter(|action| {
                !matches!(
                    action,
                    NavigationAction::MergeUserData(_) | NavigationAction::ResetUserData
                )
            })
            .collect();
        (DispatchOutcome::Transitioned(to), effects)
    }

    /// Applies a follow-up event from an effect, waiting out any transition
    /// in flight so the result is not lost. An ignored event releases the
    /// flag without settling, so this waits on idle rather than settled.
    async fn apply_when_idle(&self, event: NavigationEvent) -> DispatchOutcome {
        let mut idle = self.context.subscribe_idle();
        loop {
            let (outcome, effects) = self.apply(event.clone()).await;
            if outcome != DispatchOutcome::Dropped {
                if !effects.is_empty() {
                    warn!(?effects, "follow-up event produced effects, ignoring");
                }
                return outcome;
            }
            if idle.changed().await.is_err() {
                return outcome;
            }
        }
    }

    async fn start_effect(self: &Arc<Self>, action: NavigationAction) {
        match action {
            NavigationAction::StartAnalysis { photo_uri } => self.start_analysis(photo_uri).await,
            NavigationAction::SubmitOnboarding => self.start_submission().await,
            NavigationAction::SignOut => {
                self.cancel_analysis().await;
                let session = Arc::clone(&self.session);
                self.tasks.spawn(async move {
                    if let Err(err) = session.sign_out().await {
                        warn!(error = %err, "sign-out failed");
                    }
                });
            }
            NavigationAction::MergeUserData(_) | NavigationAction::ResetUserData => {}
        }
    }

    async fn start_analysis(self: &Arc<Self>, photo_uri: String) {
        let (run_id, cancel) = {
            let mut slot = self.analysis.lock().await;
            if slot.is_some() {
                warn!("analysis already running, not starting another");
                return;
            }
            let run = AnalysisRun {
                id: self.next_run_id.fetch_add(1, Ordering::Relaxed),
                cancel: CancellationToken::new(),
            };
            let handle = (run.id, run.cancel.clone());
            *slot = Some(run);
            handle
        };

        let this = Arc::clone(self);
        let span = info_span!("usecase.navigation.analysis", run_id);
        self.tasks.spawn(
            async move {
                let progress: Arc<dyn WorkflowProgressPort> =
                    Arc::new(PresenterProgress(Arc::clone(&this.presenter)));
                let result = this
                    .workflow
                    .run(Path::new(&photo_uri), progress, &cancel)
                    .await;

                {
                    let mut slot = this.analysis.lock().await;
                    if slot.as_ref().is_some_and(|run| run.id == run_id) {
                        *slot = None;
                    }
                }

                let event = match result {
                    Ok(analysis) => NavigationEvent::AnalysisSucceeded(Box::new(analysis)),
                    Err(AnalysisError::Cancelled) => return,
                    Err(err) => {
                        warn!(
                            tag = err.tag().as_str(),
                            options = ?err.recovery_options(),
                            "analysis failed"
                        );
                        NavigationEvent::AnalysisFailed { tag: err.tag() }
                    }
                };
                this.apply_when_idle(event).await;
            }
            .instrument(span),
        );
    }

    async fn start_submission(self: &Arc<Self>) {
        let data = self.context.user_data().await;
        let this = Arc::clone(self);
        self.tasks.spawn(
            async move {
                match this.submit_onboarding.execute(&data).await {
                    Ok(()) => {
                        this.apply_when_idle(NavigationEvent::SubmissionSucceeded)
                            .await;
                        if let Err(err) = this.session.refresh_profile().await {
                            warn!(error = %err, "profile refresh after onboarding failed");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "onboarding submission failed");
                        this.apply_when_idle(NavigationEvent::SubmissionFailed).await;
                    }
                }
            }
            .instrument(info_span!("usecase.navigation.submission")),
        );
    }

    async fn cancel_analysis(&self) {
        if let Some(run) = self.analysis.lock().await.take() {
            info!(run_id = run.id, "cancelling analysis");
            run.cancel.cancel();
        }
    }
}
