//! Classifier boundary.
//!
//! The model itself is opaque: a fixed-length vector goes in and one score
//! per emotion class comes out. The adapter owns the checks the model does
//! not make, so a malformed input or output surfaces as a classification
//! error instead of a meaningless label.

use emofeed_common::error::{EmofeedError, EmofeedResult};
use emofeed_face_model::{Emotion, EMOTION_CLASSES, EMOTION_CLASS_COUNT};

use crate::vectorizer::FeatureVector;

/// An opaque pretrained emotion model.
pub trait EmotionClassifier: Send {
    /// Model name for logging.
    fn name(&self) -> &str;

    /// Exact input length the model was trained on.
    fn input_len(&self) -> usize;

    /// Score one input vector. Scores are positional, see `EMOTION_CLASSES`.
    fn predict(&self, input: &[f64]) -> EmofeedResult<Vec<f64>>;
}

/// Validated classifier output, one score per emotion class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreVector([f64; EMOTION_CLASS_COUNT]);

impl ScoreVector {
    /// Wrap raw scores. Every value must be finite.
    pub fn new(scores: [f64; EMOTION_CLASS_COUNT]) -> EmofeedResult<Self> {
        if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
            return Err(EmofeedError::classification(format!(
                "score for {} is not finite: {}",
                EMOTION_CLASSES[i], scores[i]
            )));
        }
        Ok(Self(scores))
    }

    /// Wrap a model's raw output, checking its length.
    pub fn from_slice(scores: &[f64]) -> EmofeedResult<Self> {
        let array: [f64; EMOTION_CLASS_COUNT] = scores.try_into().map_err(|_| {
            EmofeedError::classification(format!(
                "expected {EMOTION_CLASS_COUNT} scores, got {}",
                scores.len()
            ))
        })?;
        Self::new(array)
    }

    /// Score for a scored emotion; `None` for `Unknown`.
    pub fn get(&self, emotion: Emotion) -> Option<f64> {
        emotion.class_index().map(|i| self.0[i])
    }

    pub fn as_array(&self) -> &[f64; EMOTION_CLASS_COUNT] {
        &self.0
    }

    /// `(emotion, score)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        EMOTION_CLASSES.iter().copied().zip(self.0.iter().copied())
    }
}

/// Checked invocation of an [`EmotionClassifier`].
pub struct ClassifierAdapter {
    model: Box<dyn EmotionClassifier>,
}

impl ClassifierAdapter {
    pub fn new(model: Box<dyn EmotionClassifier>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn input_len(&self) -> usize {
        self.model.input_len()
    }

    /// Run the model on one feature vector.
    pub fn classify(&self, input: &FeatureVector) -> EmofeedResult<ScoreVector> {
        let expected = self.model.input_len();
        if input.len() != expected {
            return Err(EmofeedError::classification(format!(
                "model {} expects {expected} features, got {}",
                self.model.name(),
                input.len()
            )));
        }

        let raw = self.model.predict(input.as_slice()).map_err(|e| match e {
            EmofeedError::Classification { .. } => e,
            other => EmofeedError::classification(format!(
                "model {} failed: {other}",
                self.model.name()
            )),
        })?;

        ScoreVector::from_slice(&raw)
    }
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("model", &self.model.name())
            .field("input_len", &self.model.input_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{FeatureLayout, FeatureVectorizer};
    use std::collections::BTreeMap;

    /// Returns a fixed output regardless of input.
    struct FixedModel {
        input_len: usize,
        output: Vec<f64>,
    }

    impl EmotionClassifier for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn input_len(&self) -> usize {
            self.input_len
        }

        fn predict(&self, _input: &[f64]) -> EmofeedResult<Vec<f64>> {
            Ok(self.output.clone())
        }
    }

    struct FailingModel;

    impl EmotionClassifier for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        fn input_len(&self) -> usize {
            1
        }

        fn predict(&self, _input: &[f64]) -> EmofeedResult<Vec<f64>> {
            Err(EmofeedError::Io(std::io::Error::other("backend unavailable")))
        }
    }

    fn vector(values: &[f64]) -> FeatureVector {
        let names: Vec<String> = (0..values.len()).map(|i| format!("f{i:02}")).collect();
        let input: BTreeMap<String, f64> = names.iter().cloned().zip(values.iter().copied()).collect();
        FeatureVectorizer::new(FeatureLayout::from_names(names))
            .vectorize(&input)
            .unwrap()
    }

    #[test]
    fn test_classify_returns_scores() {
        let adapter = ClassifierAdapter::new(Box::new(FixedModel {
            input_len: 2,
            output: vec![0.8, 0.1, 0.05, 0.05],
        }));
        let scores = adapter.classify(&vector(&[0.1, 0.2])).unwrap();
        assert_eq!(scores.get(Emotion::Happy), Some(0.8));
        assert_eq!(scores.get(Emotion::Unknown), None);
    }

    #[test]
    fn test_input_length_mismatch() {
        let adapter = ClassifierAdapter::new(Box::new(FixedModel {
            input_len: 51,
            output: vec![0.25; 4],
        }));
        let err = adapter.classify(&vector(&[0.1, 0.2])).unwrap_err();
        assert!(matches!(err, EmofeedError::Classification { .. }));
        assert!(err.to_string().contains("expects 51"));
    }

    #[test]
    fn test_wrong_output_length() {
        let adapter = ClassifierAdapter::new(Box::new(FixedModel {
            input_len: 1,
            output: vec![0.5, 0.5, 0.0],
        }));
        let err = adapter.classify(&vector(&[0.0])).unwrap_err();
        assert!(err.to_string().contains("expected 4 scores, got 3"));
    }

    #[test]
    fn test_non_finite_output() {
        let adapter = ClassifierAdapter::new(Box::new(FixedModel {
            input_len: 1,
            output: vec![0.5, f64::NAN, 0.0, 0.0],
        }));
        let err = adapter.classify(&vector(&[0.0])).unwrap_err();
        assert!(err.to_string().contains("sad"));
    }

    #[test]
    fn test_model_failure_becomes_classification_error() {
        let adapter = ClassifierAdapter::new(Box::new(FailingModel));
        let err = adapter.classify(&vector(&[0.0])).unwrap_err();
        assert!(matches!(err, EmofeedError::Classification { .. }));
        assert!(err.to_string().contains("backend unavailable"));
    }

    #[test]
    fn test_score_iter_follows_table() {
        let scores = ScoreVector::new([0.1, 0.2, 0.3, 0.4]).unwrap();
        let labels: Vec<Emotion> = scores.iter().map(|(e, _)| e).collect();
        assert_eq!(labels, EMOTION_CLASSES.to_vec());
    }
}
