//! Replay of recorded frame streams.

use std::path::Path;

use emofeed_common::error::{EmofeedError, EmofeedResult};
use emofeed_face_model::frame::{parse_frames, parse_header, FrameStreamHeader};
use emofeed_face_model::TrackingFrame;

use crate::TrackingSource;

/// Plays back a fixed list of frames in order.
///
/// `start` rewinds to the first frame, matching a tracker restart that
/// resets tracking. While paused, `poll` yields nothing.
#[derive(Debug)]
pub struct ReplaySource {
    frames: Vec<TrackingFrame>,
    header: Option<FrameStreamHeader>,
    index: usize,
    running: bool,
}

impl ReplaySource {
    pub fn new(frames: Vec<TrackingFrame>) -> Self {
        Self {
            frames,
            header: None,
            index: 0,
            running: false,
        }
    }

    /// Load a frames JSONL file, with optional `# {header}` line.
    pub fn from_file(path: &Path) -> EmofeedResult<Self> {
        if !path.exists() {
            return Err(EmofeedError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_jsonl(&content)
    }

    pub fn from_jsonl(content: &str) -> EmofeedResult<Self> {
        let header = match parse_header(content) {
            Some(Ok(header)) => Some(header),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Ignoring unreadable frame stream header");
                None
            }
            None => None,
        };
        let frames = parse_frames(content)
            .map_err(|e| EmofeedError::tracking(format!("Failed to parse frames: {e}")))?;

        Ok(Self {
            header,
            ..Self::new(frames)
        })
    }

    pub fn header(&self) -> Option<&FrameStreamHeader> {
        self.header.as_ref()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len() - self.index
    }
}

impl TrackingSource for ReplaySource {
    fn start(&mut self) -> EmofeedResult<()> {
        self.index = 0;
        self.running = true;
        tracing::debug!(frames = self.frames.len(), "Replay started");
        Ok(())
    }

    fn pause(&mut self) {
        self.running = false;
    }

    fn poll(&mut self) -> EmofeedResult<Option<TrackingFrame>> {
        if !self.running || self.index >= self.frames.len() {
            return Ok(None);
        }
        let frame = self.frames[self.index].clone();
        self.index += 1;
        Ok(Some(frame))
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.frames.len()
    }

    fn name(&self) -> &str {
        "replay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_requires_start() {
        let mut source = ReplaySource::new(vec![TrackingFrame::uniform(0, 0.1)]);
        assert_eq!(source.poll().unwrap(), None);
        source.start().unwrap();
        assert!(source.poll().unwrap().is_some());
        assert!(source.is_exhausted());
        assert_eq!(source.poll().unwrap(), None);
    }

    #[test]
    fn test_pause_and_restart_rewinds() {
        let frames = vec![TrackingFrame::uniform(0, 0.1), TrackingFrame::uniform(1, 0.2)];
        let mut source = ReplaySource::new(frames);
        source.start().unwrap();
        assert_eq!(source.poll().unwrap().unwrap().timestamp_ns, 0);

        source.pause();
        assert_eq!(source.poll().unwrap(), None);
        assert_eq!(source.remaining(), 1);

        source.start().unwrap();
        assert_eq!(source.poll().unwrap().unwrap().timestamp_ns, 0);
    }

    #[test]
    fn test_from_jsonl_reads_header() {
        let jsonl = concat!(
            "# {\"schema_version\":\"1.0\",\"epoch_wall\":\"2026-01-01T00:00:00Z\",\"source\":\"arkit\",\"sample_rate_hz\":60}\n",
            "{\"t\":0,\"blend_shapes\":{\"jawOpen\":0.1}}\n",
        );
        let source = ReplaySource::from_jsonl(jsonl).unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(source.header().unwrap().source, "arkit");
    }

    #[test]
    fn test_from_jsonl_bad_line_is_tracking_error() {
        let err = ReplaySource::from_jsonl("{\"t\":\"soon\"}\n").unwrap_err();
        assert!(matches!(err, EmofeedError::Tracking { .. }));
    }

    #[test]
    fn test_from_file_missing() {
        let path = std::env::temp_dir().join("emofeed_no_such_frames.jsonl");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            ReplaySource::from_file(&path),
            Err(EmofeedError::FileNotFound { .. })
        ));
    }
}
