use serde::{Deserialize, Serialize};

/// Every screen the app can show.
///
/// 应用中所有可显示的页面。只有导航控制器可以切换当前页面。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenState {
    Splash,

    // Auth flow
    WelcomeAuth,
    EmailEntry,
    EmailVerify,
    EmailSignIn,

    // Capture & analysis
    CaptureGuidelines,
    Camera,
    PhotoReview,
    Analyzing,
    AnalysisError,

    // Survey
    Gender,
    AgeRange,
    SkinType,
    SkinSensitivity,
    SunExposure,
    SleepHours,
    WaterIntake,
    Diet,
    StressLevel,
    CurrentRoutine,
    ProductsUsed,
    SkinGoals,
    TopConcern,
    ConcernDetails,
    RoutineTime,
    RoutineComplexity,
    Budget,
    NotificationsPermission,

    // Results & routine reveal
    ResultsPreview,
    MetricsBreakdown,
    RoutineBuilding,
    RoutineReady,
    SubmittingOnboarding,
    SubmissionError,

    // Main app
    MainApp,
    DailyRoutine,
    ProgressTracker,
    AnalysisHistory,
    AnalysisDetail,
    RescanGuidelines,
    RescanCamera,
    RescanAnalyzing,
    ProductDetail,
    Profile,
    EditProfile,
    Settings,
    NotificationSettings,
    Help,
    DeleteAccount,
}

/// Entry screen of the auth flow.
pub const AUTH_ENTRY_SCREEN: ScreenState = ScreenState::WelcomeAuth;
/// First onboarding screen for users who have not finished onboarding.
pub const FIRST_ONBOARDING_SCREEN: ScreenState = ScreenState::CaptureGuidelines;
/// Landing screen for users who finished onboarding.
pub const MAIN_APP_SCREEN: ScreenState = ScreenState::MainApp;
/// Where the splash bootstrap fails open when auth never resolves.
pub const SPLASH_FALLBACK_SCREEN: ScreenState = ScreenState::CaptureGuidelines;

/// Linear onboarding order from capture to submission.
const ONBOARDING_FLOW: [ScreenState; 29] = [
    ScreenState::CaptureGuidelines,
    ScreenState::Camera,
    ScreenState::PhotoReview,
    ScreenState::Analyzing,
    ScreenState::AnalysisError,
    ScreenState::Gender,
    ScreenState::AgeRange,
    ScreenState::SkinType,
    ScreenState::SkinSensitivity,
    ScreenState::SunExposure,
    ScreenState::SleepHours,
    ScreenState::WaterIntake,
    ScreenState::Diet,
    ScreenState::StressLevel,
    ScreenState::CurrentRoutine,
    ScreenState::ProductsUsed,
    ScreenState::SkinGoals,
    ScreenState::TopConcern,
    ScreenState::ConcernDetails,
    ScreenState::RoutineTime,
    ScreenState::RoutineComplexity,
    ScreenState::Budget,
    ScreenState::NotificationsPermission,
    ScreenState::ResultsPreview,
    ScreenState::MetricsBreakdown,
    ScreenState::RoutineBuilding,
    ScreenState::RoutineReady,
    ScreenState::SubmittingOnboarding,
    ScreenState::SubmissionError,
];

/// Survey questions plus the results reveal; `Continue` walks this list.
const SURVEY_SEQUENCE: [ScreenState; 22] = [
    ScreenState::Gender,
    ScreenState::AgeRange,
    ScreenState::SkinType,
    ScreenState::SkinSensitivity,
    ScreenState::SunExposure,
    ScreenState::SleepHours,
    ScreenState::WaterIntake,
    ScreenState::Diet,
    ScreenState::StressLevel,
    ScreenState::CurrentRoutine,
    ScreenState::ProductsUsed,
    ScreenState::SkinGoals,
    ScreenState::TopConcern,
    ScreenState::ConcernDetails,
    ScreenState::RoutineTime,
    ScreenState::RoutineComplexity,
    ScreenState::Budget,
    ScreenState::NotificationsPermission,
    ScreenState::ResultsPreview,
    ScreenState::MetricsBreakdown,
    ScreenState::RoutineBuilding,
    ScreenState::RoutineReady,
];

impl ScreenState {
    pub const ALL: [ScreenState; 49] = [
        Self::Splash,
        Self::WelcomeAuth,
        Self::EmailEntry,
        Self::EmailVerify,
        Self::EmailSignIn,
        Self::CaptureGuidelines,
        Self::Camera,
        Self::PhotoReview,
        Self::Analyzing,
        Self::AnalysisError,
        Self::Gender,
        Self::AgeRange,
        Self::SkinType,
        Self::SkinSensitivity,
        Self::SunExposure,
        Self::SleepHours,
        Self::WaterIntake,
        Self::Diet,
        Self::StressLevel,
        Self::CurrentRoutine,
        Self::ProductsUsed,
        Self::SkinGoals,
        Self::TopConcern,
        Self::ConcernDetails,
        Self::RoutineTime,
        Self::RoutineComplexity,
        Self::Budget,
        Self::NotificationsPermission,
        Self::ResultsPreview,
        Self::MetricsBreakdown,
        Self::RoutineBuilding,
        Self::RoutineReady,
        Self::SubmittingOnboarding,
        Self::SubmissionError,
        Self::MainApp,
        Self::DailyRoutine,
        Self::ProgressTracker,
        Self::AnalysisHistory,
        Self::AnalysisDetail,
        Self::RescanGuidelines,
        Self::RescanCamera,
        Self::RescanAnalyzing,
        Self::ProductDetail,
        Self::Profile,
        Self::EditProfile,
        Self::Settings,
        Self::NotificationSettings,
        Self::Help,
        Self::DeleteAccount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Splash => "splash",
            Self::WelcomeAuth => "welcome-auth",
            Self::EmailEntry => "email-entry",
            Self::EmailVerify => "email-verify",
            Self::EmailSignIn => "email-sign-in",
            Self::CaptureGuidelines => "capture-guidelines",
            Self::Camera => "camera",
            Self::PhotoReview => "photo-review",
            Self::Analyzing => "analyzing",
            Self::AnalysisError => "analysis-error",
            Self::Gender => "gender",
            Self::AgeRange => "age-range",
            Self::SkinType => "skin-type",
            Self::SkinSensitivity => "skin-sensitivity",
            Self::SunExposure => "sun-exposure",
            Self::SleepHours => "sleep-hours",
            Self::WaterIntake => "water-intake",
            Self::Diet => "diet",
            Self::StressLevel => "stress-level",
            Self::CurrentRoutine => "current-routine",
            Self::ProductsUsed => "products-used",
            Self::SkinGoals => "skin-goals",
            Self::TopConcern => "top-concern",
            Self::ConcernDetails => "concern-details",
            Self::RoutineTime => "routine-time",
            Self::RoutineComplexity => "routine-complexity",
            Self::Budget => "budget",
            Self::NotificationsPermission => "notifications-permission",
            Self::ResultsPreview => "results-preview",
            Self::MetricsBreakdown => "metrics-breakdown",
            Self::RoutineBuilding => "routine-building",
            Self::RoutineReady => "routine-ready",
            Self::SubmittingOnboarding => "submitting-onboarding",
            Self::SubmissionError => "submission-error",
            Self::MainApp => "main-app",
            Self::DailyRoutine => "daily-routine",
            Self::ProgressTracker => "progress-tracker",
            Self::AnalysisHistory => "analysis-history",
            Self::AnalysisDetail => "analysis-detail",
            Self::RescanGuidelines => "rescan-guidelines",
            Self::RescanCamera => "rescan-camera",
            Self::RescanAnalyzing => "rescan-analyzing",
            Self::ProductDetail => "product-detail",
            Self::Profile => "profile",
            Self::EditProfile => "edit-profile",
            Self::Settings => "settings",
            Self::NotificationSettings => "notification-settings",
            Self::Help => "help",
            Self::DeleteAccount => "delete-account",
        }
    }

    /// Screens of an in-progress auth flow. Guards never redirect away from these.
    pub fn is_auth_flow(self) -> bool {
        matches!(
            self,
            Self::WelcomeAuth | Self::EmailEntry | Self::EmailVerify | Self::EmailSignIn
        )
    }

    pub fn is_onboarding(self) -> bool {
        ONBOARDING_FLOW.contains(&self)
    }

    /// Screens a user who finished onboarding may stay on.
    pub fn is_completed_user(self) -> bool {
        matches!(
            self,
            Self::MainApp
                | Self::DailyRoutine
                | Self::ProgressTracker
                | Self::AnalysisHistory
                | Self::AnalysisDetail
                | Self::RescanGuidelines
                | Self::RescanCamera
                | Self::RescanAnalyzing
                | Self::ProductDetail
                | Self::Profile
                | Self::EditProfile
                | Self::Settings
                | Self::NotificationSettings
                | Self::Help
                | Self::DeleteAccount
        )
    }

    /// Screens that require an authenticated session.
    pub fn is_protected(self) -> bool {
        self.is_completed_user()
            || matches!(self, Self::SubmittingOnboarding | Self::SubmissionError)
    }

    /// Next survey screen for a plain `Continue`.
    pub fn next_in_survey(self) -> Option<ScreenState> {
        let index = SURVEY_SEQUENCE.iter().position(|s| *s == self)?;
        SURVEY_SEQUENCE.get(index + 1).copied()
    }

    /// Previous survey screen for `Back`. The first question has none.
    pub fn previous_in_survey(self) -> Option<ScreenState> {
        let index = SURVEY_SEQUENCE.iter().position(|s| *s == self)?;
        index.checked_sub(1).map(|i| SURVEY_SEQUENCE[i])
    }

    pub fn is_survey(self) -> bool {
        SURVEY_SEQUENCE.contains(&self)
    }

    /// Parent screen inside the main app, used for `Back`.
    pub fn main_app_parent(self) -> Option<ScreenState> {
        match self {
            Self::AnalysisDetail => Some(Self::AnalysisHistory),
            Self::EditProfile | Self::Settings => Some(Self::Profile),
            Self::NotificationSettings | Self::Help | Self::DeleteAccount => Some(Self::Settings),
            Self::ProductDetail => Some(Self::DailyRoutine),
            Self::RescanCamera => Some(Self::RescanGuidelines),
            Self::DailyRoutine
            | Self::ProgressTracker
            | Self::AnalysisHistory
            | Self::RescanGuidelines
            | Self::Profile => Some(Self::MainApp),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScreenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
