//! Headless screen layer for the CLI.

use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use tracing::info;

use sl_core::analysis::{WorkflowProgress, WorkflowStage};
use sl_core::navigation::{Direction, ScreenState};
use sl_core::ports::{ScreenPresenterPort, WorkflowProgressPort};

/// Logs screen swaps and optionally draws workflow progress on stderr.
pub struct LoggingPresenter {
    echo_progress: bool,
    last_percent: AtomicU8,
}

impl LoggingPresenter {
    pub fn new(echo_progress: bool) -> Self {
        Self {
            echo_progress,
            last_percent: AtomicU8::new(0),
        }
    }

    fn draw(&self, progress: WorkflowProgress) {
        if !self.echo_progress {
            return;
        }
        let previous = self.last_percent.swap(progress.percent, Ordering::Relaxed);
        if previous == progress.percent && !is_final(progress.stage) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = write!(
            stderr,
            "\r{:<11} {:>3}%",
            stage_label(progress.stage),
            progress.percent
        );
        if is_final(progress.stage) {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
    }
}

fn is_final(stage: WorkflowStage) -> bool {
    matches!(stage, WorkflowStage::Completed | WorkflowStage::Failed)
}

fn stage_label(stage: WorkflowStage) -> &'static str {
    match stage {
        WorkflowStage::Compressing => "compressing",
        WorkflowStage::Uploading => "uploading",
        WorkflowStage::Processing => "processing",
        WorkflowStage::Completed => "completed",
        WorkflowStage::Failed => "failed",
    }
}

#[async_trait]
impl ScreenPresenterPort for LoggingPresenter {
    async fn present(&self, from: ScreenState, to: ScreenState, direction: Direction) {
        info!(%from, %to, ?direction, "screen");
    }

    fn show_progress(&self, progress: WorkflowProgress) {
        self.draw(progress);
    }
}

impl WorkflowProgressPort for LoggingPresenter {
    fn report(&self, progress: WorkflowProgress) {
        self.draw(progress);
    }
}
