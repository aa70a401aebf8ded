use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::AnalysisId;

/// Backend analysis status.
///
/// 分析状态。`completed` 与 `failed` 为终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricLevel {
    Low,
    Moderate,
    High,
    #[serde(other)]
    Unknown,
}

/// One named skin metric. `score` and `confidence` are in `0..=1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinMetric {
    pub level: MetricLevel,
    pub score: f64,
    #[serde(default)]
    pub confidence: f64,
}

/// Analysis record as returned by `GET /analysis/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: AnalysisId,
    pub status: AnalysisStatus,
    #[serde(default)]
    pub skin_metrics: Option<BTreeMap<String, SkinMetric>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    /// Optimistic record written right after upload, mirroring the receipt.
    pub fn processing(id: AnalysisId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: AnalysisStatus::Processing,
            skin_metrics: None,
            error_message: None,
            model_version: None,
            created_at,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn metric_count(&self) -> usize {
        self.skin_metrics.as_ref().map_or(0, BTreeMap::len)
    }
}

/// `POST /analysis` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub analysis_id: AnalysisId,
    pub status: AnalysisStatus,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /analysis/{id}/status` response. `progress` is a 0–100 hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStatusReport {
    pub status: AnalysisStatus,
    #[serde(default)]
    pub progress: Option<f32>,
    #[serde(default)]
    pub error_message: Option<String>,
}
