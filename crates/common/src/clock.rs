//! Session clock and frame timing.
//!
//! Tracking frames carry monotonic timestamps relative to the moment the
//! tracking session started. [`SessionClock`] anchors that moment and its
//! wall-clock time; [`FrameDeadline`] decides when queued work is stale.

use std::time::{Duration, Instant};

/// A tracking session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment tracking started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant tracking started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The instant a frame `offset_ns` into the session is due.
    pub fn due_at(&self, offset_ns: u64) -> Instant {
        self.epoch + Duration::from_nanos(offset_ns)
    }
}

/// Maximum time a frame may wait between arrival and processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDeadline {
    budget: Duration,
}

impl FrameDeadline {
    pub fn from_millis(ms: u64) -> Self {
        Self {
            budget: Duration::from_millis(ms),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Whether a frame that arrived at `arrived` is stale at `now`.
    pub fn is_expired(&self, arrived: Instant, now: Instant) -> bool {
        now.saturating_duration_since(arrived) > self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_epoch_wall_is_rfc3339() {
        let clock = SessionClock::start();
        assert!(chrono::DateTime::parse_from_rfc3339(clock.epoch_wall()).is_ok());
    }

    #[test]
    fn test_due_at_offsets_from_epoch() {
        let clock = SessionClock::start();
        let first = clock.due_at(0);
        assert_eq!(clock.due_at(1_500_000_000) - first, Duration::from_millis(1500));
    }

    #[test]
    fn test_frame_deadline() {
        let deadline = FrameDeadline::from_millis(50);
        let arrived = Instant::now();
        assert!(!deadline.is_expired(arrived, arrived + Duration::from_millis(50)));
        assert!(deadline.is_expired(arrived, arrived + Duration::from_millis(51)));
        // A clock reading earlier than arrival is never stale.
        assert!(!deadline.is_expired(arrived + Duration::from_millis(10), arrived));
    }
}
