//! Error types shared across Emofeed crates.

use std::path::PathBuf;

/// Top-level error type for Emofeed operations.
///
/// Every per-frame variant is recoverable: callers at the frame boundary
/// downgrade the frame to an unknown label and keep going.
#[derive(Debug, thiserror::Error)]
pub enum EmofeedError {
    #[error("Missing feature: {identifier}")]
    MissingFeature { identifier: String },

    #[error("Classification error: {message}")]
    Classification { message: String },

    #[error("Confidence threshold {value} is outside [0, 1]")]
    ThresholdConfiguration { value: f64 },

    #[error("Tracking error: {message}")]
    Tracking { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using EmofeedError.
pub type EmofeedResult<T> = Result<T, EmofeedError>;

impl EmofeedError {
    pub fn missing_feature(identifier: impl Into<String>) -> Self {
        Self::MissingFeature {
            identifier: identifier.into(),
        }
    }

    pub fn classification(msg: impl Into<String>) -> Self {
        Self::Classification {
            message: msg.into(),
        }
    }

    pub fn tracking(msg: impl Into<String>) -> Self {
        Self::Tracking {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error only affects the current frame.
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            Self::MissingFeature { .. } | Self::Classification { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_feature_message_names_identifier() {
        let err = EmofeedError::missing_feature("jawOpen");
        assert_eq!(err.to_string(), "Missing feature: jawOpen");
        assert!(err.is_frame_local());
    }

    #[test]
    fn test_threshold_error_is_not_frame_local() {
        let err = EmofeedError::ThresholdConfiguration { value: 1.5 };
        assert!(err.to_string().contains("1.5"));
        assert!(!err.is_frame_local());
    }
}
