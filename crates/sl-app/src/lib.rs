//! SkinLens Application Orchestration Layer
//!
//! This crate contains the use cases that sit between the pure domain in
//! `sl-core` and the adapters: the navigation controller with its guard
//! watcher and splash bootstrap, and the analysis workflow orchestrator.

pub mod usecases;

pub use usecases::{
    AnalysisWorkflow, GuardWatcher, LoadLatestAnalysis, NavigationController, SplashBootstrap,
    SubmitOnboarding,
};
