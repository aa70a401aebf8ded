//! Fallback-data detection for completed analyses.
//!
//! When the backend model path degrades it still answers `completed`, but
//! with placeholder metrics. The checks here recognise those signatures. The
//! result is diagnostic only: callers log it and keep the analysis.

use serde::{Deserialize, Serialize};

use crate::analysis::model::{Analysis, AnalysisStatus};

/// Scores the placeholder path is known to emit.
pub const SUSPICIOUS_SCORES: [f64; 5] = [0.5, 0.6, 0.7, 0.75, 0.8];

/// Below this spread (max - min) across metrics, scores count as uniform.
pub const MIN_SCORE_SPREAD: f64 = 0.02;

/// Mean confidence below this is treated as a non-result.
pub const MIN_MEAN_CONFIDENCE: f64 = 0.3;

/// Substrings of `model_version` that mark the degraded code path.
pub const DEGRADED_MODEL_MARKERS: [&str; 4] = ["fallback", "mock", "dummy", "placeholder"];

const SCORE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackSignal {
    /// Completed without any metrics.
    MissingMetrics,
    /// Every score is one of [`SUSPICIOUS_SCORES`].
    SuspiciousRoundScores { matched: usize },
    /// Scores barely differ across metrics.
    UniformScores { spread: f64 },
    LowConfidence { mean: f64 },
    DegradedModel { model_version: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    signals: Vec<FallbackSignal>,
}

impl ValidationReport {
    pub fn looks_like_fallback(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn signals(&self) -> &[FallbackSignal] {
        &self.signals
    }

    pub fn into_signals(self) -> Vec<FallbackSignal> {
        self.signals
    }
}

/// Inspects a completed analysis for fallback signatures.
///
/// Non-completed records produce an empty report.
pub fn inspect_analysis(analysis: &Analysis) -> ValidationReport {
    let mut signals = Vec::new();
    if analysis.status != AnalysisStatus::Completed {
        return ValidationReport { signals };
    }

    if let Some(version) = analysis.model_version.as_deref() {
        let lowered = version.to_ascii_lowercase();
        if DEGRADED_MODEL_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            signals.push(FallbackSignal::DegradedModel {
                model_version: version.to_string(),
            });
        }
    }

    let metrics: Vec<_> = analysis
        .skin_metrics
        .as_ref()
        .map(|m| m.values().collect())
        .unwrap_or_default();

    if metrics.is_empty() {
        signals.push(FallbackSignal::MissingMetrics);
        return ValidationReport { signals };
    }

    let scores: Vec<f64> = metrics.iter().map(|m| m.score).collect();

    let matched = scores
        .iter()
        .filter(|score| {
            SUSPICIOUS_SCORES
                .iter()
                .any(|s| (*s - **score).abs() < SCORE_EPSILON)
        })
        .count();
    if scores.len() > 1 && matched == scores.len() {
        signals.push(FallbackSignal::SuspiciousRoundScores { matched });
    }

    if scores.len() > 1 {
        let max = scores.iter().copied().fold(f64::MIN, f64::max);
        let min = scores.iter().copied().fold(f64::MAX, f64::min);
        let spread = max - min;
        if spread < MIN_SCORE_SPREAD {
            signals.push(FallbackSignal::UniformScores { spread });
        }
    }

    let mean = metrics.iter().map(|m| m.confidence).sum::<f64>() / metrics.len() as f64;
    if mean < MIN_MEAN_CONFIDENCE {
        signals.push(FallbackSignal::LowConfidence { mean });
    }

    ValidationReport { signals }
}
