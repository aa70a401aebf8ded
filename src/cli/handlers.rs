//! Command handlers. Each returns the process exit code.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use sl_app::usecases::{GuardWatcher, SplashBootstrap};
use sl_core::analysis::AnalysisError;
use sl_core::config::SplashTimings;
use sl_core::navigation::ScreenState;

use crate::bootstrap::AppDeps;
use crate::cli::commands::{AnalyzeArgs, BootArgs};
use crate::presenter::LoggingPresenter;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CANCELLED: i32 = 130;

pub async fn handle_analyze(args: &AnalyzeArgs, deps: &AppDeps) -> i32 {
    if !args.image.is_file() {
        eprintln!("Image not found: {}", args.image.display());
        return EXIT_FAILURE;
    }

    let workflow = deps.analysis_workflow();
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling analysis");
                cancel.cancel();
            }
        })
    };

    let progress = Arc::new(LoggingPresenter::new(!args.no_progress));
    let result = workflow.run_with_report(&args.image, progress, &cancel).await;
    interrupt.abort();

    match result {
        Ok(outcome) => {
            let rendered = if args.report {
                serde_json::to_string_pretty(&serde_json::json!({
                    "analysis": outcome.analysis,
                    "fallback_signals": outcome.validation.signals(),
                }))
            } else {
                serde_json::to_string_pretty(&outcome.analysis)
            };
            print_json(rendered)
        }
        Err(AnalysisError::Cancelled) => {
            eprintln!("Analysis cancelled");
            EXIT_CANCELLED
        }
        Err(err) => {
            error!(tag = err.tag().as_str(), error = %err, "analysis failed");
            eprintln!("Analysis failed [{}]: {err}", err.tag().as_str());
            for option in err.recovery_options() {
                eprintln!("  option: {option:?}");
            }
            EXIT_FAILURE
        }
    }
}

pub async fn handle_latest(deps: &AppDeps) -> i32 {
    match deps.load_latest_analysis().execute().await {
        Ok(Some(analysis)) => print_json(serde_json::to_string_pretty(&analysis)),
        Ok(None) => {
            eprintln!("No analysis yet");
            EXIT_OK
        }
        Err(err) => {
            eprintln!("Failed to load latest analysis [{}]: {err}", err.tag().as_str());
            EXIT_FAILURE
        }
    }
}

pub async fn handle_boot(args: &BootArgs, deps: &AppDeps) -> i32 {
    let controller =
        deps.navigation_controller(ScreenState::Splash, Arc::new(LoggingPresenter::new(false)));
    let cancel = CancellationToken::new();
    let watcher = GuardWatcher::new(controller.clone(), deps.session.clone()).spawn(cancel.clone());

    let landed = SplashBootstrap::new(
        controller.clone(),
        deps.session.clone(),
        SplashTimings::from_config(&deps.config),
    )
    .run()
    .await;
    info!(screen = %landed, "splash finished");

    if args.linger_ms > 0 {
        tokio::time::sleep(Duration::from_millis(args.linger_ms)).await;
    }

    cancel.cancel();
    if let Err(err) = watcher.await {
        warn!(error = %err, "guard watcher task failed");
    }
    controller.shutdown().await;

    println!("{}", controller.current_screen().await);
    EXIT_OK
}

fn print_json(rendered: serde_json::Result<String>) -> i32 {
    match rendered {
        Ok(json) => {
            println!("{json}");
            EXIT_OK
        }
        Err(err) => {
            eprintln!("Failed to render JSON: {err}");
            EXIT_FAILURE
        }
    }
}
