use std::path::PathBuf;

use emofeed_classifier_core::{ClassifierAdapter, SoftmaxModel};
use emofeed_common::config::DecisionConfig;
use emofeed_face_model::Emotion;
use emofeed_face_tracker::sources::ReplaySource;
use emofeed_face_tracker::{EmotionPredictor, EmotionTracker, TrackingSource};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
}

fn fixture_predictor() -> EmotionPredictor {
    let model = SoftmaxModel::load(&fixtures_dir().join("models").join("expression-drivers.json"))
        .expect("fixture model should load");
    EmotionPredictor::from_config(ClassifierAdapter::new(Box::new(model)), &DecisionConfig::default())
        .expect("default decision config is valid")
}

fn fixture_source() -> ReplaySource {
    ReplaySource::from_file(&fixtures_dir().join("sample-session").join("frames.jsonl"))
        .expect("fixture frames should parse")
}

#[tokio::test]
async fn sample_session_label_counts_are_stable() {
    let source = fixture_source();
    assert_eq!(source.len(), 121);
    assert_eq!(source.header().unwrap().sample_rate_hz, 60);

    let mut tracker = EmotionTracker::new(Box::new(source), fixture_predictor());
    let summary = tracker.run().await.unwrap();

    assert_eq!(summary.frames, 121);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.stats.count(Emotion::Happy), 35);
    assert_eq!(summary.stats.count(Emotion::Sad), 20);
    assert_eq!(summary.stats.count(Emotion::Angry), 20);
    assert_eq!(summary.stats.count(Emotion::Surprised), 20);
    assert_eq!(summary.stats.count(Emotion::Unknown), 26);
    assert_eq!(summary.final_label, Emotion::Unknown);
}

#[test]
fn smile_ramp_crosses_threshold_once() {
    let mut predictor = fixture_predictor();
    let mut source = fixture_source();
    source.start().unwrap();

    let mut labels = Vec::new();
    while let Some(frame) = source.poll().unwrap() {
        labels.push(predictor.on_frame(&frame).label);
    }

    let ramp = &labels[100..120];
    let first_happy = ramp.iter().position(|l| *l == Emotion::Happy).unwrap();
    assert_eq!(first_happy, 5);
    assert!(ramp[..first_happy].iter().all(|l| *l == Emotion::Unknown));
    assert!(ramp[first_happy..].iter().all(|l| *l == Emotion::Happy));
}
