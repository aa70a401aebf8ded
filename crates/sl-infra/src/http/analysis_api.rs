use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{debug, info};

use sl_core::analysis::{Analysis, AnalysisStatusReport, ApiError, UploadReceipt};
use sl_core::ids::AnalysisId;
use sl_core::ports::{AnalysisApiPort, UploadProgress};

use super::client::{decode_json, ApiClient};
use super::error::map_transport_error;

/// Size of each streamed multipart chunk; progress is reported per chunk.
const UPLOAD_CHUNK: usize = 64 * 1024;

pub struct HttpAnalysisApi {
    client: ApiClient,
}

impl HttpAnalysisApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisApiPort for HttpAnalysisApi {
    async fn upload(
        &self,
        image: &Path,
        progress: UploadProgress,
    ) -> Result<UploadReceipt, ApiError> {
        let data = tokio::fs::read(image)
            .await
            .map_err(|e| ApiError::Io(format!("{}: {e}", image.display())))?;
        let total = data.len();
        info!(path = %image.display(), bytes = total, "uploading image");

        let file_name = image
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();
        let part = Part::stream_with_length(progress_body(Bytes::from(data), progress), total as u64)
            .file_name(file_name)
            .mime_str(mime_for(image))
            .map_err(map_transport_error)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .send(self.client.request(Method::POST, "analysis").multipart(form))
            .await?;
        let receipt: UploadReceipt = decode_json(response).await?;
        debug!(analysis_id = %receipt.analysis_id, status = receipt.status.as_str(), "upload accepted");
        Ok(receipt)
    }

    async fn status(&self, id: &AnalysisId) -> Result<AnalysisStatusReport, ApiError> {
        self.client
            .get_json(&format!("analysis/{}/status", id.as_str()))
            .await
    }

    async fn fetch(&self, id: &AnalysisId) -> Result<Analysis, ApiError> {
        self.client.get_json(&format!("analysis/{}", id.as_str())).await
    }

    async fn latest(&self) -> Result<Option<Analysis>, ApiError> {
        match self.client.get_json("analysis/latest").await {
            Ok(analysis) => Ok(Some(analysis)),
            Err(ApiError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Streams `data` in chunks, reporting the share handed to the transport.
fn progress_body(data: Bytes, progress: UploadProgress) -> reqwest::Body {
    let total = data.len();
    let chunks: Vec<Bytes> = (0..total)
        .step_by(UPLOAD_CHUNK)
        .map(|start| data.slice(start..(start + UPLOAD_CHUNK).min(total)))
        .collect();

    let mut sent = 0usize;
    let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len();
        progress(percent_of(sent, total));
        Ok::<_, std::io::Error>(chunk)
    }));
    reqwest::Body::wrap_stream(stream)
}

fn percent_of(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent.min(total) * 100) / total) as u8
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
