//! Softmax-regression model artifact.
//!
//! A versioned JSON file holding one weight row and one bias per emotion
//! class. Scores are `softmax(W·x + b)` in `EMOTION_CLASSES` order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use emofeed_common::error::{EmofeedError, EmofeedResult};
use emofeed_face_model::EMOTION_CLASS_COUNT;

use crate::classifier::EmotionClassifier;

/// Artifact format understood by this build.
pub const SOFTMAX_FORMAT_VERSION: u32 = 1;

/// Linear model with a softmax output layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxModel {
    pub format_version: u32,

    /// Human-readable model name.
    pub name: String,

    /// Feature count the weights were trained on.
    pub input_len: usize,

    /// One row per emotion class, `input_len` weights each.
    pub weights: Vec<Vec<f64>>,

    /// One bias per emotion class.
    pub bias: Vec<f64>,
}

impl SoftmaxModel {
    /// Build and validate a model from parts.
    pub fn new(
        name: impl Into<String>,
        weights: Vec<Vec<f64>>,
        bias: Vec<f64>,
    ) -> EmofeedResult<Self> {
        let input_len = weights.first().map(Vec::len).unwrap_or(0);
        let model = Self {
            format_version: SOFTMAX_FORMAT_VERSION,
            name: name.into(),
            input_len,
            weights,
            bias,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load a model artifact from disk.
    pub fn load(path: &Path) -> EmofeedResult<Self> {
        tracing::info!(path = %path.display(), "Loading emotion model");

        let content = std::fs::read_to_string(path).map_err(|e| {
            EmofeedError::classification(format!(
                "failed to read model {}: {e}",
                path.display()
            ))
        })?;
        let model = Self::from_json(&content)?;

        tracing::info!(
            name = %model.name,
            input_len = model.input_len,
            "Emotion model loaded"
        );
        Ok(model)
    }

    /// Parse and validate a model from JSON text.
    pub fn from_json(json: &str) -> EmofeedResult<Self> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| EmofeedError::classification(format!("invalid model file: {e}")))?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> EmofeedResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check shape and values.
    pub fn validate(&self) -> EmofeedResult<()> {
        if self.format_version != SOFTMAX_FORMAT_VERSION {
            return Err(EmofeedError::classification(format!(
                "unsupported model format version {}",
                self.format_version
            )));
        }
        if self.input_len == 0 {
            return Err(EmofeedError::classification("model input_len must be positive"));
        }
        if self.weights.len() != EMOTION_CLASS_COUNT || self.bias.len() != EMOTION_CLASS_COUNT {
            return Err(EmofeedError::classification(format!(
                "model must have {EMOTION_CLASS_COUNT} weight rows and biases, got {} and {}",
                self.weights.len(),
                self.bias.len()
            )));
        }
        if let Some((i, row)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.input_len)
        {
            return Err(EmofeedError::classification(format!(
                "weight row {i} has {} entries, expected {}",
                row.len(),
                self.input_len
            )));
        }
        let all_finite = self
            .weights
            .iter()
            .flatten()
            .chain(self.bias.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(EmofeedError::classification("model contains non-finite parameters"));
        }
        Ok(())
    }
}

impl EmotionClassifier for SoftmaxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn predict(&self, input: &[f64]) -> EmofeedResult<Vec<f64>> {
        if input.len() != self.input_len {
            return Err(EmofeedError::classification(format!(
                "expected {} inputs, got {}",
                self.input_len,
                input.len()
            )));
        }

        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect();

        Ok(softmax(&logits))
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_model() -> SoftmaxModel {
        // Each class reads one input feature.
        let weights = (0..4)
            .map(|class| (0..4).map(|i| if i == class { 10.0 } else { 0.0 }).collect())
            .collect();
        SoftmaxModel::new("identity", weights, vec![0.0; 4]).unwrap()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0, 1000.0]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[3] > 0.99);
    }

    #[test]
    fn test_predict_favours_active_feature() {
        let model = identity_model();
        let scores = model.predict(&[0.0, 0.0, 1.0, 0.0]).unwrap();
        let top = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(top, Some(2));
        assert!(scores[2] > 0.99);
    }

    #[test]
    fn test_predict_rejects_wrong_length() {
        let model = identity_model();
        assert!(matches!(
            model.predict(&[0.0; 3]),
            Err(EmofeedError::Classification { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_and_validation() {
        let model = identity_model();
        let json = model.to_json().unwrap();
        let parsed = SoftmaxModel::from_json(&json).unwrap();
        assert_eq!(parsed.input_len, 4);
        assert_eq!(parsed.name, "identity");
    }

    #[test]
    fn test_rejects_ragged_weights() {
        let weights = vec![vec![0.0; 3], vec![0.0; 3], vec![0.0; 2], vec![0.0; 3]];
        let err = SoftmaxModel::new("ragged", weights, vec![0.0; 4]).unwrap_err();
        assert!(err.to_string().contains("weight row 2"));
    }

    #[test]
    fn test_rejects_wrong_class_count() {
        let err = SoftmaxModel::new("three", vec![vec![0.0; 2]; 3], vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, EmofeedError::Classification { .. }));
    }

    #[test]
    fn test_rejects_unknown_format_version() {
        let mut model = identity_model();
        model.format_version = 2;
        let json = serde_json::to_string(&model).unwrap();
        assert!(SoftmaxModel::from_json(&json)
            .unwrap_err()
            .to_string()
            .contains("format version 2"));
    }

    #[test]
    fn test_load_missing_file_is_classification_error() {
        let path = std::env::temp_dir().join("emofeed_no_such_model.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            SoftmaxModel::load(&path),
            Err(EmofeedError::Classification { .. })
        ));
    }
}
