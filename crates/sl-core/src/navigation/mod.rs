//! Navigation domain.
//!
//! This module defines the screen set, the explicit transition table, the
//! reactive guard and the splash exit rule. Everything here is pure; the
//! controller that owns the current screen lives in `sl-app`.

pub mod guard;
pub mod screen;
pub mod splash;
pub mod state_machine;

pub use guard::{decide_transition, GuardInputs};
pub use screen::{
    ScreenState, AUTH_ENTRY_SCREEN, FIRST_ONBOARDING_SCREEN, MAIN_APP_SCREEN,
    SPLASH_FALLBACK_SCREEN,
};
pub use splash::{decide_splash_exit, SplashDecision};
pub use state_machine::{
    Direction, NavigationAction, NavigationEvent, NavigationStateMachine, Transition,
};
