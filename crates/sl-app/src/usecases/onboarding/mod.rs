mod submit;

pub use submit::{SubmitOnboarding, SubmitOnboardingError};
