//! Business logic use cases
//!
//! 导航控制器拥有页面状态与用户数据；分析流程只返回结果，不触碰导航。

pub mod analysis;
pub mod navigation;
pub mod onboarding;

pub use analysis::{AnalysisWorkflow, LoadLatestAnalysis, WorkflowOutcome};
pub use navigation::{
    DispatchOutcome, GuardOutcome, GuardWatcher, NavigationContext, NavigationController,
    SplashBootstrap,
};
pub use onboarding::{SubmitOnboarding, SubmitOnboardingError};
