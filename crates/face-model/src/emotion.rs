//! Emotion labels and the score-vector index binding.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete emotion decided for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprised,
    /// No class reached the confidence threshold, or the frame failed.
    #[default]
    Unknown,
}

/// Number of classes a classifier scores.
pub const EMOTION_CLASS_COUNT: usize = 4;

/// Binding from score-vector position to emotion.
///
/// Position also serves as tie-break priority: earlier entries win ties.
pub const EMOTION_CLASSES: [Emotion; EMOTION_CLASS_COUNT] = [
    Emotion::Happy,
    Emotion::Sad,
    Emotion::Angry,
    Emotion::Surprised,
];

impl Emotion {
    /// Position of this emotion in a score vector, if it is a scored class.
    pub fn class_index(&self) -> Option<usize> {
        EMOTION_CLASSES.iter().position(|e| e == self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_table_order() {
        assert_eq!(EMOTION_CLASSES[0], Emotion::Happy);
        assert_eq!(EMOTION_CLASSES[1], Emotion::Sad);
        assert_eq!(EMOTION_CLASSES[2], Emotion::Angry);
        assert_eq!(EMOTION_CLASSES[3], Emotion::Surprised);
    }

    #[test]
    fn test_class_index_inverts_table() {
        for (i, emotion) in EMOTION_CLASSES.iter().enumerate() {
            assert_eq!(emotion.class_index(), Some(i));
        }
        assert_eq!(Emotion::Unknown.class_index(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Emotion::Surprised).unwrap(), "\"surprised\"");
        let parsed: Emotion = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(parsed, Emotion::Unknown);
        assert_eq!(Emotion::default(), Emotion::Unknown);
    }

    #[test]
    fn test_display_matches_serde() {
        for emotion in EMOTION_CLASSES.iter().chain([Emotion::Unknown].iter()) {
            let json = serde_json::to_string(emotion).unwrap();
            assert_eq!(json.trim_matches('"'), emotion.to_string());
        }
    }
}
