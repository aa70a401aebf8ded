mod load_latest;
mod workflow;

pub use load_latest::LoadLatestAnalysis;
pub use workflow::{AnalysisWorkflow, WorkflowOutcome};
