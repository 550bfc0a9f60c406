//! Blend-shape identifiers emitted by the face tracker.
//!
//! The vocabulary is the 51 ARKit 1.0 face-anchor locations, named by their
//! raw string values. Variants are declared in canonical order: ascending
//! byte-wise by raw name, which is the order classifiers are trained on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! blend_shapes {
    ($($variant:ident => $name:literal,)+) => {
        /// A tracked facial deformation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum BlendShape {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl BlendShape {
            /// Every identifier, in canonical order.
            pub const ALL: &'static [BlendShape] = &[$(BlendShape::$variant,)+];

            /// Raw identifier as reported by the tracker.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(BlendShape::$variant => $name,)+
                }
            }
        }

        impl FromStr for BlendShape {
            type Err = UnknownBlendShape;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(BlendShape::$variant),)+
                    other => Err(UnknownBlendShape(other.to_string())),
                }
            }
        }
    };
}

blend_shapes! {
    BrowDownLeft => "browDown_L",
    BrowDownRight => "browDown_R",
    BrowInnerUp => "browInnerUp",
    BrowOuterUpLeft => "browOuterUp_L",
    BrowOuterUpRight => "browOuterUp_R",
    CheekPuff => "cheekPuff",
    CheekSquintLeft => "cheekSquint_L",
    CheekSquintRight => "cheekSquint_R",
    EyeBlinkLeft => "eyeBlink_L",
    EyeBlinkRight => "eyeBlink_R",
    EyeLookDownLeft => "eyeLookDown_L",
    EyeLookDownRight => "eyeLookDown_R",
    EyeLookInLeft => "eyeLookIn_L",
    EyeLookInRight => "eyeLookIn_R",
    EyeLookOutLeft => "eyeLookOut_L",
    EyeLookOutRight => "eyeLookOut_R",
    EyeLookUpLeft => "eyeLookUp_L",
    EyeLookUpRight => "eyeLookUp_R",
    EyeSquintLeft => "eyeSquint_L",
    EyeSquintRight => "eyeSquint_R",
    EyeWideLeft => "eyeWide_L",
    EyeWideRight => "eyeWide_R",
    JawForward => "jawForward",
    JawLeft => "jawLeft",
    JawOpen => "jawOpen",
    JawRight => "jawRight",
    MouthClose => "mouthClose",
    MouthDimpleLeft => "mouthDimple_L",
    MouthDimpleRight => "mouthDimple_R",
    MouthFrownLeft => "mouthFrown_L",
    MouthFrownRight => "mouthFrown_R",
    MouthFunnel => "mouthFunnel",
    MouthLeft => "mouthLeft",
    MouthLowerDownLeft => "mouthLowerDown_L",
    MouthLowerDownRight => "mouthLowerDown_R",
    MouthPressLeft => "mouthPress_L",
    MouthPressRight => "mouthPress_R",
    MouthPucker => "mouthPucker",
    MouthRight => "mouthRight",
    MouthRollLower => "mouthRollLower",
    MouthRollUpper => "mouthRollUpper",
    MouthShrugLower => "mouthShrugLower",
    MouthShrugUpper => "mouthShrugUpper",
    MouthSmileLeft => "mouthSmile_L",
    MouthSmileRight => "mouthSmile_R",
    MouthStretchLeft => "mouthStretch_L",
    MouthStretchRight => "mouthStretch_R",
    MouthUpperUpLeft => "mouthUpperUp_L",
    MouthUpperUpRight => "mouthUpperUp_R",
    NoseSneerLeft => "noseSneer_L",
    NoseSneerRight => "noseSneer_R",
}

/// Number of identifiers in the ARKit vocabulary.
pub const BLEND_SHAPE_COUNT: usize = 51;

/// A name that is not part of the blend-shape vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blend shape: {0}")]
pub struct UnknownBlendShape(pub String);

impl fmt::Display for BlendShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BlendShape {
    /// Raw names of every identifier, in canonical order.
    pub fn canonical_names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(BlendShape::as_str)
    }
}
