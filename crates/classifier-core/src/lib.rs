//! Emofeed Classifier Core — per-frame emotion decisions
//!
//! Turns one tracker update into one emotion label:
//! - **Vectorizer:** Packs identifier → intensity maps into canonical order
//! - **Classifier:** Adapter around an opaque model, plus a JSON softmax artifact
//! - **Decision:** Picks the top class and applies the confidence threshold
//!
//! This crate is pure computation apart from loading model files.
//! All inputs are data; all outputs are data.

pub mod classifier;
pub mod decision;
pub mod softmax;
pub mod vectorizer;

pub use classifier::{ClassifierAdapter, EmotionClassifier, ScoreVector};
pub use decision::{decide, ConfidenceThreshold};
pub use softmax::SoftmaxModel;
pub use vectorizer::{FeatureLayout, FeatureVector, FeatureVectorizer};
