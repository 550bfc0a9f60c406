//! Emofeed Face Model
//!
//! Defines the data contracts shared by the tracking and classification
//! crates:
//! - **Blend shapes:** The fixed identifier vocabulary a face tracker emits
//! - **Frames:** Timestamped identifier → intensity maps, stored as JSONL
//! - **Emotions:** The closed label set and the score-index binding
//!
//! Intensities are normalized to `[0.0, 1.0]` by the tracker; nothing here
//! validates them.

pub mod blend_shape;
pub mod emotion;
pub mod frame;

pub use blend_shape::*;
pub use emotion::*;
pub use frame::*;
