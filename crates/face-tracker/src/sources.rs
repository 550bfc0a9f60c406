//! Tracking source implementations.
//!
//! Live face trackers are platform services; the sources here feed
//! recorded or scripted frames through the same interface.

pub mod replay;

pub use replay::ReplaySource;
