//! Skin analysis domain: backend record, workflow progress, fallback-data
//! validation and the error taxonomy surfaced to callers.

pub mod error;
pub mod model;
pub mod progress;
pub mod validation;

pub use error::{AnalysisError, ApiError, ErrorTag, RecoveryOption};
pub use model::{
    Analysis, AnalysisStatus, AnalysisStatusReport, MetricLevel, SkinMetric, UploadReceipt,
};
pub use progress::{ProgressTracker, WorkflowProgress, WorkflowStage};
pub use validation::{inspect_analysis, FallbackSignal, ValidationReport};
