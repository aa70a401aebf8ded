//! Runtime policies resolved from [`AppConfig`].
//!
//! A zero or empty value in the DTO means "not configured" and resolves to
//! the default. `Option` fields resolve only when `None`.

use std::time::Duration;

use crate::config::AppConfig;

fn or_default_ms(ms: u64, default: Duration) -> Duration {
    if ms == 0 {
        default
    } else {
        Duration::from_millis(ms)
    }
}

fn or_default<T: PartialEq + Default>(value: T, default: T) -> T {
    if value == T::default() {
        default
    } else {
        value
    }
}

/// Splash hold and its single extension window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashTimings {
    pub min_hold: Duration,
    pub extension: Duration,
}

impl Default for SplashTimings {
    fn default() -> Self {
        Self {
            min_hold: Duration::from_secs(2),
            extension: Duration::from_secs(1),
        }
    }
}

impl SplashTimings {
    pub fn from_config(config: &AppConfig) -> Self {
        let defaults = Self::default();
        Self {
            min_hold: or_default_ms(config.splash_min_hold_ms, defaults.min_hold),
            extension: or_default_ms(config.splash_extension_ms, defaults.extension),
        }
    }
}

/// Status polling bounds. The defaults cap a run at about five minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Consecutive transient failures tolerated before giving up.
    pub max_transient_retries: u32,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 100,
            max_transient_retries: 3,
        }
    }
}

impl PollingPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        let defaults = Self::default();
        Self {
            interval: or_default_ms(config.polling_interval_ms, defaults.interval),
            max_attempts: or_default(config.polling_max_attempts, defaults.max_attempts),
            max_transient_retries: config
                .polling_max_transient_retries
                .unwrap_or(defaults.max_transient_retries),
        }
    }

    /// Upper bound on time spent polling, ignoring request latency.
    pub fn total_budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Hard timeout for the whole upload request.
    pub timeout: Duration,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

impl UploadPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        if config.upload_timeout_secs == 0 {
            return Self::default();
        }
        Self {
            timeout: Duration::from_secs(config.upload_timeout_secs),
        }
    }
}

/// Resolution/quality preset for the pre-upload compression step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionPreset {
    /// Longest edge in pixels after resizing.
    pub max_edge: u32,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for CompressionPreset {
    fn default() -> Self {
        Self {
            max_edge: 1024,
            jpeg_quality: 80,
        }
    }
}

impl CompressionPreset {
    pub fn from_config(config: &AppConfig) -> Self {
        let defaults = Self::default();
        Self {
            max_edge: or_default(config.compression_max_edge, defaults.max_edge),
            jpeg_quality: or_default(config.compression_jpeg_quality, defaults.jpeg_quality)
                .min(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_resolves_to_defaults() {
        let config = AppConfig::empty();

        assert_eq!(SplashTimings::from_config(&config), SplashTimings::default());
        assert_eq!(PollingPolicy::from_config(&config), PollingPolicy::default());
        assert_eq!(UploadPolicy::from_config(&config), UploadPolicy::default());
        assert_eq!(
            CompressionPreset::from_config(&config),
            CompressionPreset::default()
        );
    }

    #[test]
    fn test_configured_values_win() {
        let config = AppConfig {
            splash_min_hold_ms: 500,
            polling_interval_ms: 1000,
            polling_max_attempts: 10,
            upload_timeout_secs: 5,
            compression_jpeg_quality: 60,
            ..AppConfig::empty()
        };

        assert_eq!(
            SplashTimings::from_config(&config).min_hold,
            Duration::from_millis(500)
        );
        assert_eq!(
            SplashTimings::from_config(&config).extension,
            Duration::from_secs(1)
        );
        let polling = PollingPolicy::from_config(&config);
        assert_eq!(polling.total_budget(), Duration::from_secs(10));
        assert_eq!(polling.max_transient_retries, 3);
        assert_eq!(
            UploadPolicy::from_config(&config).timeout,
            Duration::from_secs(5)
        );
        assert_eq!(CompressionPreset::from_config(&config).jpeg_quality, 60);
    }

    #[test]
    fn test_zero_transient_retries_is_honoured() {
        let config = AppConfig {
            polling_max_transient_retries: Some(0),
            ..AppConfig::empty()
        };

        let polling = PollingPolicy::from_config(&config);

        assert_eq!(polling.max_transient_retries, 0);
        assert_eq!(polling.max_attempts, PollingPolicy::default().max_attempts);
    }

    #[test]
    fn test_default_polling_budget_is_five_minutes() {
        assert_eq!(
            PollingPolicy::default().total_budget(),
            Duration::from_secs(300)
        );
    }
}
