use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::CompressionPreset;

#[async_trait]
pub trait ImageCompressorPort: Send + Sync {
    /// Writes a resized/re-encoded copy and returns its path. The original
    /// file is left untouched.
    async fn compress(&self, source: &Path, preset: &CompressionPreset)
        -> anyhow::Result<PathBuf>;
}
