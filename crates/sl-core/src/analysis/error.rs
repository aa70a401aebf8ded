//! Error taxonomy for the analysis workflow.
//!
//! `ApiError` is what the transport reports. `AnalysisError` is what the
//! workflow hands to its caller, and every variant carries a stable
//! [`ErrorTag`] so screens and logs can match on it without parsing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::validation::FallbackSignal;
use crate::ids::AnalysisId;

/// Stable taxonomy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTag {
    NetworkError,
    NotFoundError,
    AnalysisFailedError,
    BackendDegradedError,
    TimeoutError,
    CancelledError,
}

impl ErrorTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::NotFoundError => "not_found_error",
            Self::AnalysisFailedError => "analysis_failed_error",
            Self::BackendDegradedError => "backend_degraded_error",
            Self::TimeoutError => "timeout_error",
            Self::CancelledError => "cancelled_error",
        }
    }
}

/// Choices offered to the user after a failed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryOption {
    /// Go back to capture and take a new photo.
    RetakePhoto,
    /// Continue the flow without an analysis result.
    ProceedAnyway,
}

/// Classified workflow failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("analysis {analysis_id} not found")]
    NotFound { analysis_id: AnalysisId },

    #[error("analysis failed: {message}")]
    AnalysisFailed {
        analysis_id: Option<AnalysisId>,
        message: String,
    },

    #[error("analysis {analysis_id} looks like fallback data ({} signal(s))", .signals.len())]
    BackendDegraded {
        analysis_id: AnalysisId,
        signals: Vec<FallbackSignal>,
    },

    #[error("analysis {analysis_id} still processing after {attempts} status checks")]
    Timeout {
        analysis_id: AnalysisId,
        attempts: u32,
    },

    #[error("analysis workflow cancelled")]
    Cancelled,
}

impl AnalysisError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn tag(&self) -> ErrorTag {
        match self {
            Self::Network { .. } => ErrorTag::NetworkError,
            Self::NotFound { .. } => ErrorTag::NotFoundError,
            Self::AnalysisFailed { .. } => ErrorTag::AnalysisFailedError,
            Self::BackendDegraded { .. } => ErrorTag::BackendDegradedError,
            Self::Timeout { .. } => ErrorTag::TimeoutError,
            Self::Cancelled => ErrorTag::CancelledError,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Whether the error is meant to reach the user. `BackendDegraded` is
    /// diagnostic only, and `Cancelled` was requested by the caller.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::BackendDegraded { .. } | Self::Cancelled)
    }

    pub fn recovery_options(&self) -> &'static [RecoveryOption] {
        match self {
            Self::Network { .. }
            | Self::NotFound { .. }
            | Self::AnalysisFailed { .. }
            | Self::Timeout { .. } => &[RecoveryOption::RetakePhoto, RecoveryOption::ProceedAnyway],
            Self::BackendDegraded { .. } | Self::Cancelled => &[],
        }
    }
}

/// Transport-level error reported by API adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request could not reach the server: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("resource not found")]
    NotFound,

    #[error("server responded with {code}: {message}")]
    Status { code: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request body could not be built from local data.
    #[error("could not read local file: {0}")]
    Io(String),
}

impl ApiError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Status { code, .. } => matches!(code, 429 | 502 | 503 | 504),
            Self::NotFound | Self::Decode(_) | Self::Io(_) => false,
        }
    }

    /// Wraps the transport error with the workflow taxonomy.
    pub fn classify(self, analysis_id: Option<&AnalysisId>) -> AnalysisError {
        match self {
            Self::NotFound => match analysis_id {
                Some(id) => AnalysisError::NotFound {
                    analysis_id: id.clone(),
                },
                None => AnalysisError::AnalysisFailed {
                    analysis_id: None,
                    message: "analysis endpoint not found".to_string(),
                },
            },
            err if err.is_transient() => AnalysisError::network(err.to_string()),
            err => AnalysisError::AnalysisFailed {
                analysis_id: analysis_id.cloned(),
                message: err.to_string(),
            },
        }
    }
}
