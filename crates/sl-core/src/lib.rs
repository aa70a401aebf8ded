//! # sl-core
//!
//! Core domain models and business rules for SkinLens.
//!
//! This crate contains pure logic without any infrastructure dependencies:
//! the screen set and its transition table, the reactive navigation guard,
//! the onboarding accumulator, the analysis model with its validation rules,
//! and the port traits implemented by the infrastructure layer.

pub mod analysis;
pub mod auth;
pub mod config;
pub mod ids;
pub mod navigation;
pub mod onboarding;
pub mod ports;

// Re-export commonly used types at the crate root
pub use analysis::{
    Analysis, AnalysisError, AnalysisStatus, ErrorTag, WorkflowProgress, WorkflowStage,
};
pub use auth::{AuthSnapshot, UserProfile};
pub use config::AppConfig;
pub use ids::{AnalysisId, UserId};
pub use navigation::{Direction, NavigationEvent, ScreenState};
pub use onboarding::{UserData, UserDataPatch};
