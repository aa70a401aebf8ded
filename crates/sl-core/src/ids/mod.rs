//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Backend-issued analysis identifier (`analysis_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(String);

/// Authenticated user identifier, as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl_id!(AnalysisId, UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_id_from_str() {
        let id: AnalysisId = "A1".into();
        assert_eq!(id.as_str(), "A1");
        assert_eq!(id.to_string(), "A1");
    }

    #[test]
    fn test_analysis_id_serializes_as_plain_string() {
        let id = AnalysisId::new("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
        let back: AnalysisId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(back, id);
    }
}
