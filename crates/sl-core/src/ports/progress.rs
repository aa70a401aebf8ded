use crate::analysis::WorkflowProgress;

/// Receives workflow progress. Values are non-decreasing within one run.
pub trait WorkflowProgressPort: Send + Sync {
    fn report(&self, progress: WorkflowProgress);
}

/// Discards progress.
pub struct NoopWorkflowProgress;

impl WorkflowProgressPort for NoopWorkflowProgress {
    fn report(&self, _progress: WorkflowProgress) {}
}
