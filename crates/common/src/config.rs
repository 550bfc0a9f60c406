//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::clock::FrameDeadline;
use crate::error::{EmofeedError, EmofeedResult};

/// Default minimum top score for accepting an emotion label.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model artifact used when none is given on the command line.
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Per-frame decision settings.
    #[serde(default)]
    pub decision: DecisionConfig,

    /// Frame pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How a frame that lacks a canonical feature is handled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MissingFeaturePolicy {
    /// Fail the frame with a missing-feature error.
    #[default]
    Reject,
    /// Fill the gap with a fixed value.
    Substitute { value: f64 },
}

/// Decision settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Minimum top score in [0.0, 1.0]; inclusive.
    pub confidence_threshold: f64,

    /// Handling for frames missing a canonical feature.
    #[serde(default)]
    pub missing_feature: MissingFeaturePolicy,
}

/// Frame pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frames that waited longer than this before classification are dropped.
    pub frame_deadline_ms: Option<u64>,

    /// Sleep between polls when the tracking source has nothing ready.
    pub idle_poll_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "emofeed=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            decision: DecisionConfig::default(),
            pipeline: PipelineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            missing_feature: MissingFeaturePolicy::Reject,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_deadline_ms: Some(100),
            idle_poll_ms: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PipelineConfig {
    pub fn frame_deadline(&self) -> Option<FrameDeadline> {
        self.frame_deadline_ms.map(FrameDeadline::from_millis)
    }

    pub fn idle_poll(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.idle_poll_ms)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> EmofeedResult<Self> {
        if !path.exists() {
            return Err(EmofeedError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot constrain.
    pub fn validate(&self) -> EmofeedResult<()> {
        let threshold = self.decision.confidence_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(EmofeedError::ThresholdConfiguration { value: threshold });
        }
        if let MissingFeaturePolicy::Substitute { value } = self.decision.missing_feature {
            if !value.is_finite() {
                return Err(EmofeedError::config(format!(
                    "missing-feature substitute must be finite, got {value}"
                )));
            }
        }
        if self.pipeline.frame_deadline_ms == Some(0) {
            return Err(EmofeedError::config("frame_deadline_ms must be positive"));
        }
        Ok(())
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("emofeed").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.decision.confidence_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.decision.missing_feature, MissingFeaturePolicy::Reject);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        for bad in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let mut config = AppConfig::default();
            config.decision.confidence_threshold = bad;
            assert!(matches!(
                config.validate(),
                Err(EmofeedError::ThresholdConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_threshold_bounds_are_inclusive() {
        for ok in [0.0, 1.0] {
            let mut config = AppConfig::default();
            config.decision.confidence_threshold = ok;
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "decision": { "confidence_threshold": 0.55 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert!((config.decision.confidence_threshold - 0.55).abs() < f64::EPSILON);
        assert_eq!(config.pipeline.frame_deadline_ms, Some(100));
        assert_eq!(
            config.pipeline.frame_deadline(),
            Some(FrameDeadline::from_millis(100))
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_feature_policy_json_shape() {
        let policy = MissingFeaturePolicy::Substitute { value: 0.0 };
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, r#"{"policy":"substitute","value":0.0}"#);
        let parsed: MissingFeaturePolicy = serde_json::from_str(r#"{"policy":"reject"}"#).unwrap();
        assert_eq!(parsed, MissingFeaturePolicy::Reject);
    }

    #[test]
    fn test_load_from_rejects_bad_threshold() {
        let dir = std::env::temp_dir().join("emofeed_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{ "decision": { "confidence_threshold": 2.0 } }"#).unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, EmofeedError::ThresholdConfiguration { value } if value == 2.0));
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("emofeed_test_config_absent/config.json");
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(EmofeedError::FileNotFound { .. })
        ));
    }
}
