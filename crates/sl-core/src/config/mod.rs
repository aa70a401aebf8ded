//! # Pure Data Module / 纯数据模块
//!
//! [`AppConfig`] maps the TOML file onto plain fields and nothing else: no
//! validation, no defaults. A missing value is read as empty or zero and is a
//! fact, not an error. Fields where zero is a meaningful setting are
//! `Option`s instead.
//!
//! Defaults and fallbacks live in [`policy`], which resolves the runtime
//! policies from this DTO.

pub mod policy;

pub use policy::{CompressionPreset, PollingPolicy, SplashTimings, UploadPolicy};

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Analysis API base URL (may be empty)
    pub api_base_url: String,

    /// Bearer token for the API (may be empty)
    pub api_access_token: String,

    pub splash_min_hold_ms: u64,
    pub splash_extension_ms: u64,

    pub polling_interval_ms: u64,
    pub polling_max_attempts: u32,
    /// `Some(0)` disables retries; `None` means not configured.
    pub polling_max_transient_retries: Option<u32>,

    pub upload_timeout_secs: u64,

    pub compression_max_edge: u32,
    pub compression_jpeg_quality: u8,
}

fn read_str<'a>(value: &'a toml::Value, section: &str, key: &str) -> &'a str {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn read_opt_uint(value: &toml::Value, section: &str, key: &str) -> Option<u64> {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .and_then(|v| u64::try_from(v).ok())
}

fn read_uint(value: &toml::Value, section: &str, key: &str) -> u64 {
    read_opt_uint(value, section, key).unwrap_or(0)
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// **Prohibited / 禁止**: no validation or default value logic here.
    /// Out-of-range integers are read as zero.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            api_base_url: read_str(toml_value, "api", "base_url").to_string(),
            api_access_token: read_str(toml_value, "api", "access_token").to_string(),
            splash_min_hold_ms: read_uint(toml_value, "splash", "min_hold_ms"),
            splash_extension_ms: read_uint(toml_value, "splash", "extension_ms"),
            polling_interval_ms: read_uint(toml_value, "polling", "interval_ms"),
            polling_max_attempts: u32::try_from(read_uint(toml_value, "polling", "max_attempts"))
                .unwrap_or(0),
            polling_max_transient_retries: read_opt_uint(
                toml_value,
                "polling",
                "max_transient_retries",
            )
            .and_then(|v| u32::try_from(v).ok()),
            upload_timeout_secs: read_uint(toml_value, "upload", "timeout_secs"),
            compression_max_edge: u32::try_from(read_uint(toml_value, "compression", "max_edge"))
                .unwrap_or(0),
            compression_jpeg_quality: u8::try_from(read_uint(
                toml_value,
                "compression",
                "jpeg_quality",
            ))
            .unwrap_or(0),
        })
    }

    /// Create empty AppConfig (all empty/zero values)
    /// 创建空的 AppConfig
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn test_from_toml_reads_every_section() {
        let toml_str = r#"
            [api]
            base_url = "https://api.skinlens.test"
            access_token = "tok"

            [splash]
            min_hold_ms = 1500
            extension_ms = 500

            [polling]
            interval_ms = 2000
            max_attempts = 50
            max_transient_retries = 5

            [upload]
            timeout_secs = 30

            [compression]
            max_edge = 768
            jpeg_quality = 70
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.api_base_url, "https://api.skinlens.test");
        assert_eq!(config.api_access_token, "tok");
        assert_eq!(config.splash_min_hold_ms, 1500);
        assert_eq!(config.splash_extension_ms, 500);
        assert_eq!(config.polling_interval_ms, 2000);
        assert_eq!(config.polling_max_attempts, 50);
        assert_eq!(config.polling_max_transient_retries, Some(5));
        assert_eq!(config.upload_timeout_secs, 30);
        assert_eq!(config.compression_max_edge, 768);
        assert_eq!(config.compression_jpeg_quality, 70);
    }

    #[test]
    fn test_from_toml_missing_values_are_empty_facts() {
        let toml_value: Value = toml::from_str("[api]\n").unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_from_toml_keeps_explicit_zero_retries() {
        let toml_value: Value = toml::from_str("[polling]\nmax_transient_retries = 0\n").unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.polling_max_transient_retries, Some(0));
        assert_eq!(AppConfig::empty().polling_max_transient_retries, None);
    }

    #[test]
    fn test_from_toml_out_of_range_reads_as_zero() {
        let toml_value: Value =
            toml::from_str("[compression]\njpeg_quality = 900\n[polling]\nmax_attempts = -3\n")
                .unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.compression_jpeg_quality, 0);
        assert_eq!(config.polling_max_attempts, 0);
    }
}
