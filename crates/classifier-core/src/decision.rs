//! Confidence-threshold decision.
//!
//! The top class is found by scanning `EMOTION_CLASSES` in table order and
//! keeping the first strictly greater score, so equal scores resolve to the
//! lowest ordinal on every run.

use emofeed_common::config::DEFAULT_CONFIDENCE_THRESHOLD;
use emofeed_common::error::{EmofeedError, EmofeedResult};
use emofeed_face_model::{Emotion, EMOTION_CLASSES};

use crate::classifier::ScoreVector;

/// Minimum top score for accepting a label. Always within [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThreshold(f64);

impl ConfidenceThreshold {
    pub fn new(value: f64) -> EmofeedResult<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(EmofeedError::ThresholdConfiguration { value });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for ConfidenceThreshold {
    fn default() -> Self {
        Self(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

/// Highest-scoring class, ties going to the earliest table entry.
pub fn top_class(scores: &ScoreVector) -> (Emotion, f64) {
    let values = scores.as_array();
    let mut best = (EMOTION_CLASSES[0], values[0]);
    for (emotion, score) in EMOTION_CLASSES.iter().zip(values.iter()).skip(1) {
        if *score > best.1 {
            best = (*emotion, *score);
        }
    }
    best
}

/// Label for one frame's scores. The threshold is inclusive.
pub fn decide(scores: &ScoreVector, threshold: ConfidenceThreshold) -> Emotion {
    let (emotion, score) = top_class(scores);
    if score >= threshold.value() {
        emotion
    } else {
        Emotion::Unknown
    }
}
