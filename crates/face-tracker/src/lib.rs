//! Emofeed Face Tracker
//!
//! Drives emotion decisions from a stream of face-tracking frames. Uses a
//! pluggable source architecture so recorded and live trackers share one
//! loop:
//!
//! - **Synchronous:** [`EmotionTracker`] polls a source and classifies every
//!   frame inline, the way a tracker callback does.
//! - **Latest-wins:** [`worker::spawn_classification_worker`] classifies on a
//!   separate task and coalesces frames that arrive while it is busy.
//!
//! Decisions can be logged in append-only JSONL format.

pub mod predictor;
pub mod sources;
pub mod worker;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use emofeed_common::error::EmofeedResult;
use emofeed_face_model::{DecisionRecord, Emotion, TrackingFrame};

pub use predictor::{EmotionPredictor, PredictorStats};
pub use worker::{spawn_classification_worker, ClassificationWorker, WorkerReport, WorkerStop};
pub use writer::{DecisionLogHeader, DecisionWriter};

/// Trait for face-tracking sources.
pub trait TrackingSource: Send {
    /// Begin (or restart) tracking. Restarting resets tracking state.
    fn start(&mut self) -> EmofeedResult<()>;

    /// Suspend tracking; `poll` yields nothing until the next `start`.
    fn pause(&mut self);

    /// Poll for the next frame. Returns `None` if no frame is available.
    fn poll(&mut self) -> EmofeedResult<Option<TrackingFrame>>;

    /// Whether the source will never produce another frame.
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Totals for one tracking run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSummary {
    pub frames: u64,
    pub failed: u64,
    pub final_label: Emotion,
    pub stats: PredictorStats,
}

/// Receives every decision as it is made, e.g. to refresh a feed.
pub type DecisionObserver = Box<dyn FnMut(&DecisionRecord) + Send>;

/// Coordinates a tracking source with a predictor and optional decision log.
pub struct EmotionTracker {
    source: Box<dyn TrackingSource>,
    predictor: EmotionPredictor,
    writer: Option<DecisionWriter>,
    observer: Option<DecisionObserver>,
    stop_flag: Arc<AtomicBool>,
    idle_poll: Duration,
}

impl EmotionTracker {
    pub fn new(source: Box<dyn TrackingSource>, predictor: EmotionPredictor) -> Self {
        Self {
            source,
            predictor,
            writer: None,
            observer: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            idle_poll: Duration::from_millis(1),
        }
    }

    /// Log every decision to `writer`.
    pub fn with_writer(mut self, writer: DecisionWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Call `observer` after every frame.
    pub fn with_observer(mut self, observer: DecisionObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_idle_poll(mut self, idle_poll: Duration) -> Self {
        self.idle_poll = idle_poll;
        self
    }

    /// Run the tracking loop until the source is exhausted or the stop flag is set.
    pub async fn run(&mut self) -> EmofeedResult<TrackerSummary> {
        self.source.start()?;
        tracing::info!(
            source = %self.source.name(),
            model = %self.predictor.model_name(),
            threshold = self.predictor.threshold().value(),
            "Emotion tracker started"
        );

        let result = self.poll_loop().await;
        self.source.pause();
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        result?;

        let stats = self.predictor.stats().clone();
        tracing::info!(
            frames = stats.frames,
            failed = stats.failed,
            label = %self.predictor.current(),
            "Emotion tracker stopped"
        );

        Ok(TrackerSummary {
            frames: stats.frames,
            failed: stats.failed,
            final_label: self.predictor.current(),
            stats,
        })
    }

    async fn poll_loop(&mut self) -> EmofeedResult<()> {
        while !self.stop_flag.load(Ordering::Relaxed) {
            match self.source.poll() {
                Ok(Some(frame)) => {
                    let record = self.predictor.on_frame(&frame);
                    if let Some(writer) = self.writer.as_mut() {
                        writer.write_record(&record)?;
                    }
                    if let Some(observer) = self.observer.as_mut() {
                        observer(&record);
                    }
                    tokio::task::yield_now().await;
                }
                Ok(None) if self.source.is_exhausted() => break,
                Ok(None) => {
                    tokio::time::sleep(self.idle_poll).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Tracking source error");
                    if self.source.is_exhausted() {
                        break;
                    }
                    tokio::time::sleep(self.idle_poll).await;
                }
            }
        }
        Ok(())
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Latest decided label.
    pub fn current(&self) -> Emotion {
        self.predictor.current()
    }

    pub fn predictor(&self) -> &EmotionPredictor {
        &self.predictor
    }
}
