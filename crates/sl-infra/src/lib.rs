//! Adapters implementing the `sl-core` ports.
//!
//! - [`http`]: REST client for the analysis, onboarding and profile endpoints
//! - [`compress`]: JPEG compressor used before upload
//! - [`cache`]: in-memory analysis cache
//! - [`session`]: bearer-token session provider

pub mod cache;
pub mod compress;
pub mod http;
pub mod session;

pub use cache::InMemoryAnalysisCache;
pub use compress::JpegImageCompressor;
pub use http::{ApiClient, BearerToken, HttpAnalysisApi, HttpOnboardingApi, ProfileApi};
pub use session::TokenSessionProvider;
