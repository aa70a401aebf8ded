//! Navigation use cases: the controller, its context, the reactive guard
//! watcher and the splash bootstrap.

pub mod context;
mod controller;
mod guard_watcher;
mod splash;

pub use context::NavigationContext;
pub use controller::{DispatchOutcome, GuardOutcome, NavigationController};
pub use guard_watcher::GuardWatcher;
pub use splash::SplashBootstrap;
