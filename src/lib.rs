//! SkinLens client core: bootstrap, wiring and the command-line driver.
//!
//! The domain lives in `sl-core`, the use cases in `sl-app` and the adapters
//! in `sl-infra`; this crate only assembles them.

pub mod bootstrap;
pub mod cli;
pub mod presenter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
