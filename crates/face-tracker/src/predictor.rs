//! Per-frame emotion prediction.
//!
//! Runs vectorize → classify → decide for one frame and keeps the latest
//! label. Any frame-level failure downgrades that frame to `unknown` and is
//! logged; it never stops the caller.

use std::collections::HashMap;

use emofeed_classifier_core::{
    decide, ClassifierAdapter, ConfidenceThreshold, FeatureLayout, FeatureVectorizer, ScoreVector,
};
use emofeed_common::config::DecisionConfig;
use emofeed_common::error::EmofeedResult;
use emofeed_face_model::{DecisionRecord, Emotion, TrackingFrame};

/// Running totals over processed frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictorStats {
    pub frames: u64,
    pub failed: u64,
    pub labels: HashMap<Emotion, u64>,
}

impl PredictorStats {
    pub fn count(&self, emotion: Emotion) -> u64 {
        self.labels.get(&emotion).copied().unwrap_or(0)
    }
}

/// Turns tracking frames into emotion labels.
#[derive(Debug)]
pub struct EmotionPredictor {
    vectorizer: FeatureVectorizer,
    classifier: ClassifierAdapter,
    threshold: ConfidenceThreshold,
    current: Emotion,
    stats: PredictorStats,
}

impl EmotionPredictor {
    pub fn new(
        vectorizer: FeatureVectorizer,
        classifier: ClassifierAdapter,
        threshold: ConfidenceThreshold,
    ) -> Self {
        if vectorizer.layout().len() != classifier.input_len() {
            tracing::warn!(
                layout = vectorizer.layout().len(),
                model = classifier.input_len(),
                model_name = %classifier.model_name(),
                "Feature layout does not match model input; every frame will fail"
            );
        }

        Self {
            vectorizer,
            classifier,
            threshold,
            current: Emotion::Unknown,
            stats: PredictorStats::default(),
        }
    }

    /// ARKit layout with threshold and missing-feature policy from config.
    pub fn from_config(classifier: ClassifierAdapter, config: &DecisionConfig) -> EmofeedResult<Self> {
        let threshold = ConfidenceThreshold::new(config.confidence_threshold)?;
        let vectorizer = FeatureVectorizer::new(FeatureLayout::arkit()).with_policy(config.missing_feature);
        Ok(Self::new(vectorizer, classifier, threshold))
    }

    /// Classify one frame without touching predictor state.
    pub fn classify(&self, frame: &TrackingFrame) -> EmofeedResult<(Emotion, ScoreVector)> {
        let features = self.vectorizer.vectorize(frame)?;
        let scores = self.classifier.classify(&features)?;
        Ok((decide(&scores, self.threshold), scores))
    }

    /// Process one tracker update and make its label current.
    pub fn on_frame(&mut self, frame: &TrackingFrame) -> DecisionRecord {
        let record = match self.classify(frame) {
            Ok((label, scores)) => {
                tracing::trace!(t = frame.timestamp_ns, %label, "Frame classified");
                DecisionRecord {
                    timestamp_ns: frame.timestamp_ns,
                    label,
                    scores: Some(*scores.as_array()),
                    error: None,
                }
            }
            Err(e) => {
                if e.is_frame_local() {
                    tracing::warn!(t = frame.timestamp_ns, error = %e, "Frame fell back to unknown");
                } else {
                    tracing::error!(t = frame.timestamp_ns, error = %e, "Frame fell back to unknown");
                }
                self.stats.failed += 1;
                DecisionRecord {
                    timestamp_ns: frame.timestamp_ns,
                    label: Emotion::Unknown,
                    scores: None,
                    error: Some(e.to_string()),
                }
            }
        };

        if record.label != self.current {
            tracing::debug!(from = %self.current, to = %record.label, "Emotion changed");
        }
        self.current = record.label;
        self.stats.frames += 1;
        *self.stats.labels.entry(record.label).or_insert(0) += 1;
        record
    }

    /// Latest decided label; `unknown` before the first frame.
    pub fn current(&self) -> Emotion {
        self.current
    }

    pub fn threshold(&self) -> ConfidenceThreshold {
        self.threshold
    }

    pub fn stats(&self) -> &PredictorStats {
        &self.stats
    }

    pub fn model_name(&self) -> &str {
        self.classifier.model_name()
    }
}
