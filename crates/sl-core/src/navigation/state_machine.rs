//! Navigation state machine.
//!
//! Defines a pure transition function for explicit (user or workflow driven)
//! navigation. Reactive redirects live in [`super::guard`].

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, ErrorTag};
use crate::navigation::screen::ScreenState;
use crate::onboarding::{SkinConcern, UserData, UserDataPatch};

/// Direction hint handed to the presenter with every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    /// Redirect without history semantics (guards, splash exit, sign-out).
    Replace,
}

/// Events that drive navigation.
///
/// 驱动导航的事件。
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// Primary button of the current screen.
    Continue,
    Back,
    /// Camera shutter. `None` means the capture was cancelled or failed.
    TakePicture { photo_uri: Option<String> },
    RetakePhoto,
    PhotoConfirmed,
    /// A survey screen submitted its answer.
    AnswerSubmitted(UserDataPatch),
    TopConcernSelected { concern: SkinConcern },

    // Results (from the analysis workflow)
    AnalysisSucceeded(Box<Analysis>),
    AnalysisFailed { tag: ErrorTag },
    ProceedAnyway,

    // Results (from onboarding submission)
    SubmissionSucceeded,
    SubmissionFailed,
    ContinueAnyway,
    RetrySubmission,

    /// Direct jump, only honoured inside the auth flow or the main app.
    OpenScreen(ScreenState),
    SignOut,
}

/// Side-effects produced by transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationAction {
    /// Merge into the accumulator. Applied before the screen changes.
    MergeUserData(UserDataPatch),
    /// Run the analysis workflow for a captured photo.
    StartAnalysis { photo_uri: String },
    /// Post the accumulator to the onboarding endpoint.
    SubmitOnboarding,
    ResetUserData,
    /// Ask the session provider to end the session.
    SignOut,
}

/// Result of a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub to: ScreenState,
    pub direction: Direction,
    pub actions: Vec<NavigationAction>,
}

impl Transition {
    fn forward(to: ScreenState) -> Self {
        Self {
            to,
            direction: Direction::Forward,
            actions: Vec::new(),
        }
    }

    fn backward(to: ScreenState) -> Self {
        Self {
            to,
            direction: Direction::Backward,
            actions: Vec::new(),
        }
    }

    fn replace(to: ScreenState) -> Self {
        Self {
            to,
            direction: Direction::Replace,
            actions: Vec::new(),
        }
    }

    fn with(mut self, action: NavigationAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Merges to apply before the screen changes.
    pub fn merges(&self) -> impl Iterator<Item = &UserDataPatch> {
        self.actions.iter().filter_map(|action| match action {
            NavigationAction::MergeUserData(patch) => Some(patch),
            _ => None,
        })
    }
}

/// Pure navigation state machine.
///
/// 纯状态机：不包含副作用。返回 `None` 表示事件在当前页面上被忽略。
pub struct NavigationStateMachine;

impl NavigationStateMachine {
    pub fn transition(
        screen: ScreenState,
        event: NavigationEvent,
        user_data: &UserData,
        is_authenticated: bool,
    ) -> Option<Transition> {
        use NavigationEvent as E;
        use ScreenState as S;

        match (screen, event) {
            // Splash exit is owned by the bootstrap timer.
            (S::Splash, _) => None,

            (current, E::SignOut) => {
                if current == S::WelcomeAuth && user_data.is_empty() {
                    return None;
                }
                Some(
                    Transition::replace(S::WelcomeAuth)
                        .with(NavigationAction::ResetUserData)
                        .with(NavigationAction::SignOut),
                )
            }

            // Auth flow
            (S::WelcomeAuth, E::Continue) => Some(Transition::forward(S::EmailEntry)),
            (S::EmailEntry, E::Continue) => Some(Transition::forward(S::EmailVerify)),
            (S::EmailEntry, E::Back) | (S::EmailSignIn, E::Back) => {
                Some(Transition::backward(S::WelcomeAuth))
            }
            (S::EmailVerify, E::Back) => Some(Transition::backward(S::EmailEntry)),
            (S::EmailVerify, E::Continue) | (S::EmailSignIn, E::Continue) => {
                // Users who authenticate at the end of onboarding still owe
                // the submission.
                if user_data.has_analysis() {
                    Some(
                        Transition::forward(S::SubmittingOnboarding)
                            .with(NavigationAction::SubmitOnboarding),
                    )
                } else {
                    Some(Transition::forward(S::CaptureGuidelines))
                }
            }
            (from, E::OpenScreen(to)) if from.is_auth_flow() && to.is_auth_flow() => {
                Some(Transition::forward(to))
            }

            // Capture & analysis
            (S::CaptureGuidelines, E::Continue) => Some(Transition::forward(S::Camera)),
            (S::Camera, E::Back) => Some(Transition::backward(S::CaptureGuidelines)),
            (S::Camera, E::TakePicture { photo_uri }) => photo_uri.map(|uri| {
                Transition::forward(S::PhotoReview)
                    .with(NavigationAction::MergeUserData(UserDataPatch::photo(uri)))
            }),
            (S::PhotoReview, E::Back) | (S::PhotoReview, E::RetakePhoto) => {
                Some(Transition::backward(S::Camera))
            }
            (S::PhotoReview, E::Continue) | (S::PhotoReview, E::PhotoConfirmed) => {
                let photo_uri = user_data.photo_uri.clone()?;
                Some(
                    Transition::forward(S::Analyzing)
                        .with(NavigationAction::StartAnalysis { photo_uri }),
                )
            }
            (S::Analyzing, E::AnalysisSucceeded(analysis)) => Some(
                Transition::forward(S::Gender)
                    .with(NavigationAction::MergeUserData(UserDataPatch::analysis(
                        *analysis,
                    ))),
            ),
            (S::Analyzing, E::AnalysisFailed { .. }) => {
                Some(Transition::replace(S::AnalysisError))
            }
            (S::AnalysisError, E::RetakePhoto) | (S::AnalysisError, E::Back) => {
                Some(Transition::backward(S::CaptureGuidelines))
            }
            (S::AnalysisError, E::ProceedAnyway) | (S::AnalysisError, E::Continue) => {
                Some(Transition::forward(S::Gender))
            }

            // Survey
            (S::TopConcern, E::TopConcernSelected { concern }) => Some(
                Transition::forward(S::ConcernDetails)
                    .with(NavigationAction::MergeUserData(UserDataPatch::top_concern(
                        concern,
                    ))),
            ),
            (S::RoutineReady, E::Continue) => {
                if is_authenticated {
                    Some(
                        Transition::forward(S::SubmittingOnboarding)
                            .with(NavigationAction::SubmitOnboarding),
                    )
                } else {
                    Some(Transition::forward(S::WelcomeAuth))
                }
            }
            (current, E::AnswerSubmitted(patch)) if current.is_survey() => {
                let next = current.next_in_survey()?;
                Some(Transition::forward(next).with(NavigationAction::MergeUserData(patch)))
            }
            (current, E::Continue) if current.is_survey() => {
                current.next_in_survey().map(Transition::forward)
            }
            (current, E::Back) if current.is_survey() => {
                current.previous_in_survey().map(Transition::backward)
            }

            // Submission
            (S::SubmittingOnboarding, E::SubmissionSucceeded) => Some(
                Transition::replace(S::MainApp).with(NavigationAction::ResetUserData),
            ),
            (S::SubmittingOnboarding, E::SubmissionFailed) => {
                Some(Transition::replace(S::SubmissionError))
            }
            (S::SubmissionError, E::ContinueAnyway) => Some(
                Transition::replace(S::MainApp).with(NavigationAction::ResetUserData),
            ),
            (S::SubmissionError, E::RetrySubmission) => Some(
                Transition::replace(S::SubmittingOnboarding)
                    .with(NavigationAction::SubmitOnboarding),
            ),

            // Main app
            (S::RescanGuidelines, E::Continue) => Some(Transition::forward(S::RescanCamera)),
            (S::RescanCamera, E::TakePicture { photo_uri }) => photo_uri.map(|uri| {
                Transition::forward(S::RescanAnalyzing)
                    .with(NavigationAction::MergeUserData(UserDataPatch::photo(
                        uri.clone(),
                    )))
                    .with(NavigationAction::StartAnalysis { photo_uri: uri })
            }),
            (S::RescanAnalyzing, E::AnalysisSucceeded(analysis)) => Some(
                Transition::replace(S::AnalysisDetail)
                    .with(NavigationAction::MergeUserData(UserDataPatch::analysis(
                        *analysis,
                    ))),
            ),
            (S::RescanAnalyzing, E::AnalysisFailed { .. }) => {
                Some(Transition::replace(S::RescanGuidelines))
            }
            (from, E::OpenScreen(to))
                if from.is_completed_user() && to.is_completed_user() && from != to =>
            {
                Some(Transition::forward(to))
            }
            (current, E::Back) if current.is_completed_user() => {
                current.main_app_parent().map(Transition::backward)
            }

            _ => None,
        }
    }
}
