//! REST adapters.
//!
//! All endpoints share one [`ApiClient`]: base URL, a pooled `reqwest`
//! client, and the bearer token of the current session.

mod analysis_api;
mod client;
mod error;
mod onboarding_api;
mod profile;

pub use analysis_api::HttpAnalysisApi;
pub use client::{ApiClient, BearerToken};
pub use onboarding_api::HttpOnboardingApi;
pub use profile::ProfileApi;
