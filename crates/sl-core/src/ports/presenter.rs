use async_trait::async_trait;

use crate::analysis::WorkflowProgress;
use crate::navigation::{Direction, ScreenState};

/// Screen layer as seen by the navigation controller.
///
/// `present` resolves when the swap (and its animation) has finished; the
/// controller keeps its in-flight flag raised until then.
///
/// 页面展示层。`present` 在页面切换动画完成后返回。
#[async_trait]
pub trait ScreenPresenterPort: Send + Sync {
    async fn present(&self, from: ScreenState, to: ScreenState, direction: Direction);

    /// Progress of a running analysis, for the analyzing screen.
    fn show_progress(&self, _progress: WorkflowProgress) {}
}
