//! Feature vector assembly.
//!
//! A classifier is trained on one specific feature ordering. The layout
//! fixes that ordering (identifiers sorted ascending by name) and the
//! vectorizer reads each identifier from the tracker's map in that order.

use std::collections::{BTreeMap, HashMap};

use emofeed_common::config::MissingFeaturePolicy;
use emofeed_common::error::{EmofeedError, EmofeedResult};
use emofeed_face_model::{BlendShape, TrackingFrame};

/// Anything that can answer "what is the intensity of feature `name`?".
pub trait FeatureSource {
    fn feature(&self, name: &str) -> Option<f64>;
}

impl FeatureSource for BTreeMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl FeatureSource for HashMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl FeatureSource for TrackingFrame {
    fn feature(&self, name: &str) -> Option<f64> {
        self.blend_shapes.get(name).copied()
    }
}

/// Canonical identifier order for a classifier's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    names: Vec<String>,
}

impl FeatureLayout {
    /// The 51-entry ARKit blend-shape layout.
    pub fn arkit() -> Self {
        Self::from_names(BlendShape::canonical_names())
    }

    /// Build a layout from any identifier set. Names are sorted ascending
    /// and duplicates removed.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Identifiers in canonical order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of an identifier in the vector, if it is part of the layout.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).ok()
    }
}

/// Canonical-order classifier input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Packs tracker output into feature vectors.
#[derive(Debug, Clone)]
pub struct FeatureVectorizer {
    layout: FeatureLayout,
    policy: MissingFeaturePolicy,
}

impl FeatureVectorizer {
    /// Create a vectorizer that rejects frames with missing features.
    pub fn new(layout: FeatureLayout) -> Self {
        Self {
            layout,
            policy: MissingFeaturePolicy::Reject,
        }
    }

    pub fn with_policy(mut self, policy: MissingFeaturePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn policy(&self) -> MissingFeaturePolicy {
        self.policy
    }

    /// Read every layout identifier from `source`, in canonical order.
    ///
    /// Identifiers in `source` that are not in the layout are ignored.
    pub fn vectorize<S: FeatureSource + ?Sized>(&self, source: &S) -> EmofeedResult<FeatureVector> {
        let mut values = Vec::with_capacity(self.layout.len());
        for name in self.layout.names() {
            let value = match (source.feature(name), self.policy) {
                (Some(value), _) => value,
                (None, MissingFeaturePolicy::Substitute { value }) => {
                    tracing::debug!(feature = %name, value, "Substituting missing feature");
                    value
                }
                (None, MissingFeaturePolicy::Reject) => {
                    return Err(EmofeedError::missing_feature(name.as_str()));
                }
            };
            values.push(value);
        }
        Ok(FeatureVector(values))
    }
}
