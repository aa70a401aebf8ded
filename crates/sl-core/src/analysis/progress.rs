//! Workflow progress model.
//!
//! Overall percent ranges per stage:
//!
//! ```text
//! compressing   0 ..= 10
//! uploading    10 ..= 80   (upload 0–100 mapped linearly)
//! processing   80 ..= 95   (backend hint, else attempt-based)
//! completed         100
//! ```

use serde::{Deserialize, Serialize};

pub const COMPRESS_DONE_PERCENT: u8 = 10;
pub const UPLOAD_START_PERCENT: u8 = 10;
pub const UPLOAD_END_PERCENT: u8 = 80;
pub const PROCESSING_CEILING_PERCENT: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Compressing,
    Uploading,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowProgress {
    pub stage: WorkflowStage,
    pub percent: u8,
}

/// Maps an upload percentage (0–100) into the overall range.
pub fn upload_percent(upload: u8) -> u8 {
    let span = u32::from(UPLOAD_END_PERCENT - UPLOAD_START_PERCENT);
    let upload = u32::from(upload.min(100));
    UPLOAD_START_PERCENT + (upload * span / 100) as u8
}

/// Overall percent while the backend is processing.
///
/// Uses the backend's own hint when present, otherwise creeps towards the
/// ceiling with the poll attempt count.
pub fn processing_percent(hint: Option<f32>, attempt: u32, max_attempts: u32) -> u8 {
    let span = f32::from(PROCESSING_CEILING_PERCENT - UPLOAD_END_PERCENT);
    let fraction = match hint {
        Some(hint) if hint.is_finite() => (hint / 100.0).clamp(0.0, 1.0),
        _ if max_attempts > 0 => (attempt as f32 / max_attempts as f32).clamp(0.0, 1.0),
        _ => 0.0,
    };
    UPLOAD_END_PERCENT + (fraction * span).round() as u8
}

/// Enforces non-decreasing percent across one workflow invocation.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last_percent: u8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps `percent` so it never goes below what was already reported.
    pub fn advance(&mut self, stage: WorkflowStage, percent: u8) -> WorkflowProgress {
        let percent = percent.min(100).max(self.last_percent);
        self.last_percent = percent;
        WorkflowProgress { stage, percent }
    }

    pub fn last_percent(&self) -> u8 {
        self.last_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_percent_maps_into_10_80() {
        assert_eq!(upload_percent(0), 10);
        assert_eq!(upload_percent(50), 45);
        assert_eq!(upload_percent(100), 80);
        assert_eq!(upload_percent(250), 80);
    }

    #[test]
    fn test_processing_percent_prefers_backend_hint() {
        assert_eq!(processing_percent(Some(100.0), 1, 100), 95);
        assert_eq!(processing_percent(Some(0.0), 50, 100), 80);
        assert_eq!(processing_percent(None, 50, 100), 88);
        assert_eq!(processing_percent(Some(f32::NAN), 0, 0), 80);
    }

    #[test]
    fn test_tracker_never_goes_backwards() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.advance(WorkflowStage::Uploading, 40).percent, 40);
        assert_eq!(tracker.advance(WorkflowStage::Uploading, 30).percent, 40);
        assert_eq!(tracker.advance(WorkflowStage::Completed, 100).percent, 100);
    }
}
