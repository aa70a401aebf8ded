use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::analysis::{Analysis, AnalysisStatusReport, ApiError, UploadReceipt};
use crate::ids::AnalysisId;

/// Upload progress callback, called with 0..=100.
pub type UploadProgress = Arc<dyn Fn(u8) + Send + Sync>;

/// Analysis REST API.
///
/// 分析服务接口。后端视为不透明的 REST 服务。
#[async_trait]
pub trait AnalysisApiPort: Send + Sync {
    /// `POST /analysis` with the image as multipart body.
    async fn upload(&self, image: &Path, progress: UploadProgress)
        -> Result<UploadReceipt, ApiError>;

    /// `GET /analysis/{id}/status`
    async fn status(&self, id: &AnalysisId) -> Result<AnalysisStatusReport, ApiError>;

    /// `GET /analysis/{id}`
    async fn fetch(&self, id: &AnalysisId) -> Result<Analysis, ApiError>;

    /// `GET /analysis/latest`. `None` when the user has no analysis yet.
    async fn latest(&self) -> Result<Option<Analysis>, ApiError>;
}
