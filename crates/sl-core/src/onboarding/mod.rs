//! Onboarding domain models
//!
//! The onboarding funnel collects answers screen by screen into a single
//! [`UserData`] accumulator. Screens never write it directly: they hand a
//! [`UserDataPatch`] to navigation, which merges it before transitioning.

mod user_data;

pub use user_data::{
    AgeRange, Budget, Gender, OnboardingSubmission, RoutineComplexity, RoutineTime,
    SensitivityLevel, SkinConcern, SkinType, SunExposure, UserData, UserDataPatch,
};
