//! Pre-upload JPEG compression.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, GenericImageView};
use tracing::debug;

use sl_core::config::CompressionPreset;
use sl_core::ports::ImageCompressorPort;

/// Downscales to the preset's longest edge and re-encodes as JPEG.
///
/// 上传前压缩：缩放到最长边并重新编码为 JPEG，原文件保持不变。
pub struct JpegImageCompressor {
    output_dir: PathBuf,
}

impl JpegImageCompressor {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// `<cache dir>/skinlens/uploads`, or the temp dir when there is no cache dir.
    pub fn default_output_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("skinlens")
            .join("uploads")
    }
}

#[async_trait]
impl ImageCompressorPort for JpegImageCompressor {
    async fn compress(&self, source: &Path, preset: &CompressionPreset) -> Result<PathBuf> {
        let bytes = tokio::fs::read(source)
            .await
            .with_context(|| format!("read {}", source.display()))?;
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("create {}", self.output_dir.display()))?;

        let target = self
            .output_dir
            .join(format!("{}.jpg", uuid::Uuid::new_v4()));
        let preset = *preset;
        let encoded = tokio::task::spawn_blocking(move || encode(&bytes, &preset))
            .await
            .context("compression task panicked")??;

        tokio::fs::write(&target, &encoded)
            .await
            .with_context(|| format!("write {}", target.display()))?;
        debug!(
            source = %source.display(),
            target = %target.display(),
            bytes = encoded.len(),
            "image compressed"
        );
        Ok(target)
    }
}

fn encode(bytes: &[u8], preset: &CompressionPreset) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes).context("decode image for upload")?;
    let (width, height) = decoded.dimensions();
    let (target_width, target_height) = calculate_target_size(width, height, preset.max_edge);

    let resized = if (target_width, target_height) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(target_width, target_height, FilterType::Triangle)
    };

    let rgb = resized.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, preset.jpeg_quality.clamp(1, 100))
        .encode_image(&rgb)
        .context("encode jpeg")?;
    Ok(out)
}

fn calculate_target_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    if width >= height {
        let scaled_height = ((height as f64) * (max_edge as f64) / (width as f64)).round() as u32;
        (max_edge, scaled_height.max(1))
    } else {
        let scaled_width = ((width as f64) * (max_edge as f64) / (height as f64)).round() as u32;
        (scaled_width.max(1), max_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn portrait_photo_is_bounded_by_height() {
        assert_eq!(calculate_target_size(3024, 4032, 1024), (768, 1024));
        assert_eq!(calculate_target_size(800, 600, 1024), (800, 600));
    }

    #[tokio::test]
    async fn compress_writes_resized_jpeg_and_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("face.png");
        write_png(&source, 2048, 1024);

        let compressor = JpegImageCompressor::new(dir.path().join("out"));
        let preset = CompressionPreset {
            max_edge: 512,
            jpeg_quality: 70,
        };
        let output = compressor.compress(&source, &preset).await.unwrap();

        assert!(source.exists());
        assert_eq!(output.extension().and_then(|e| e.to_str()), Some("jpg"));
        let decoded = image::open(&output).unwrap();
        assert_eq!(decoded.dimensions(), (512, 256));
    }

    #[tokio::test]
    async fn undecodable_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.jpg");
        std::fs::write(&source, b"not an image").unwrap();

        let compressor = JpegImageCompressor::new(dir.path());
        assert!(compressor
            .compress(&source, &CompressionPreset::default())
            .await
            .is_err());
    }
}
