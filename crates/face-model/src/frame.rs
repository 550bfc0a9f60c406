//! Tracking frames and per-frame decision records.
//!
//! Frames are stored one JSON object per line. An optional first line of the
//! form `# {header}` describes the session; comment and blank lines are
//! skipped when parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::blend_shape::BlendShape;
use crate::emotion::{Emotion, EMOTION_CLASS_COUNT};

/// Monotonic timestamp in nanoseconds since tracking start.
pub type TimestampNs = u64;

/// One tracker update: identifier → intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingFrame {
    /// Monotonic nanoseconds since tracking start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Raw identifier names mapped to intensities in [0.0, 1.0].
    pub blend_shapes: BTreeMap<String, f64>,
}

/// Session metadata written ahead of a frame stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at tracking start (ISO 8601).
    pub epoch_wall: String,

    /// Name of the tracker that produced the frames.
    pub source: String,

    /// Nominal tracker update rate (Hz).
    pub sample_rate_hz: u32,
}

/// Outcome of classifying one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    pub label: Emotion,

    /// Classifier scores, absent when the frame failed before scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<[f64; EMOTION_CLASS_COUNT]>,

    /// Why the frame fell back to `unknown`, if it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrackingFrame {
    pub fn new(timestamp_ns: TimestampNs, blend_shapes: BTreeMap<String, f64>) -> Self {
        Self {
            timestamp_ns,
            blend_shapes,
        }
    }

    /// Build a frame from typed identifiers.
    pub fn from_shapes(
        timestamp_ns: TimestampNs,
        shapes: impl IntoIterator<Item = (BlendShape, f64)>,
    ) -> Self {
        Self {
            timestamp_ns,
            blend_shapes: shapes
                .into_iter()
                .map(|(shape, value)| (shape.as_str().to_string(), value))
                .collect(),
        }
    }

    /// A frame reporting `value` for every ARKit identifier.
    pub fn uniform(timestamp_ns: TimestampNs, value: f64) -> Self {
        Self::from_shapes(
            timestamp_ns,
            BlendShape::ALL.iter().map(|shape| (*shape, value)),
        )
    }

    /// Intensity for a typed identifier, if present.
    pub fn get(&self, shape: BlendShape) -> Option<f64> {
        self.blend_shapes.get(shape.as_str()).copied()
    }
}

impl DecisionRecord {
    /// Timestamp as fractional seconds since tracking start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<TrackingFrame>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Extract the `# {header}` line, if the content starts with one.
pub fn parse_header(jsonl: &str) -> Option<Result<FrameStreamHeader, serde_json::Error>> {
    let first = jsonl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let body = first.strip_prefix('#')?;
    Some(serde_json::from_str(body.trim()))
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[TrackingFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
