//! Models and frames shared by unit tests.

use emofeed_classifier_core::{
    ClassifierAdapter, ConfidenceThreshold, EmotionClassifier, FeatureLayout, FeatureVectorizer,
    SoftmaxModel,
};
use emofeed_common::error::EmofeedResult;
use emofeed_face_model::{BlendShape, TrackingFrame, BLEND_SHAPE_COUNT};

use crate::predictor::EmotionPredictor;

/// Returns the same scores for every input.
pub(crate) struct FixedScores(pub [f64; 4]);

impl EmotionClassifier for FixedScores {
    fn name(&self) -> &str {
        "fixed-scores"
    }

    fn input_len(&self) -> usize {
        BLEND_SHAPE_COUNT
    }

    fn predict(&self, _input: &[f64]) -> EmofeedResult<Vec<f64>> {
        Ok(self.0.to_vec())
    }
}

pub(crate) fn predictor_with_scores(scores: [f64; 4]) -> EmotionPredictor {
    EmotionPredictor::new(
        FeatureVectorizer::new(FeatureLayout::arkit()),
        ClassifierAdapter::new(Box::new(FixedScores(scores))),
        ConfidenceThreshold::default(),
    )
}

/// Happy when both mouth-smile shapes are high, undecided otherwise.
pub(crate) fn smile_model() -> SoftmaxModel {
    let layout = FeatureLayout::arkit();
    let mut happy = vec![0.0; layout.len()];
    for shape in [BlendShape::MouthSmileLeft, BlendShape::MouthSmileRight] {
        if let Some(i) = layout.index_of(shape.as_str()) {
            happy[i] = 8.0;
        }
    }
    let zeros = vec![0.0; layout.len()];
    SoftmaxModel::new(
        "smile",
        vec![happy, zeros.clone(), zeros.clone(), zeros],
        vec![-4.0, 0.0, 0.0, 0.0],
    )
    .expect("smile model is well formed")
}

pub(crate) fn smile_frame(timestamp_ns: u64, smile: f64) -> TrackingFrame {
    let mut frame = TrackingFrame::uniform(timestamp_ns, 0.0);
    for shape in [BlendShape::MouthSmileLeft, BlendShape::MouthSmileRight] {
        frame.blend_shapes.insert(shape.as_str().to_string(), smile);
    }
    frame
}
