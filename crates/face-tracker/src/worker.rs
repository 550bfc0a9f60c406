//! Latest-wins classification worker.
//!
//! Frames are handed over through a single-slot `watch` channel: a frame
//! submitted while the worker is busy replaces any frame still waiting, so
//! the worker only ever sees the newest one. Decisions are published in
//! strictly increasing sequence order. With a deadline set, a frame that
//! waited too long before processing is dropped instead of classified.
//! The worker ends when every submitter is dropped or its [`WorkerStop`]
//! handle fires, whichever comes first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use emofeed_common::clock::FrameDeadline;
use emofeed_face_model::{DecisionRecord, TrackingFrame};

use crate::predictor::EmotionPredictor;

#[derive(Debug, Clone)]
struct PendingFrame {
    seq: u64,
    frame: TrackingFrame,
    arrived: Instant,
}

/// A decision tagged with the submission sequence it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedDecision {
    pub seq: u64,
    pub record: DecisionRecord,
}

/// What the worker did before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Frames classified.
    pub processed: u64,
    /// Frames replaced by a newer frame before the worker reached them.
    pub superseded: u64,
    /// Frames dropped for exceeding the deadline.
    pub stale: u64,
    /// Sequence of the last classified frame.
    pub last_seq: Option<u64>,
}

/// Producer handle. Dropping it stops the worker once pending work is done.
pub struct FrameSubmitter {
    tx: watch::Sender<Option<PendingFrame>>,
    next_seq: u64,
}

impl FrameSubmitter {
    /// Offer a frame, replacing any frame not yet picked up. Returns its sequence.
    pub fn submit(&mut self, frame: TrackingFrame) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.tx.send_replace(Some(PendingFrame {
            seq,
            frame,
            arrived: Instant::now(),
        }));
        seq
    }

    /// Number of frames submitted so far.
    pub fn submitted(&self) -> u64 {
        self.next_seq
    }
}

/// Stops the worker even while submitters are still alive.
///
/// A pending frame that has not been picked up is abandoned.
#[derive(Debug, Clone, Default)]
pub struct WorkerStop {
    flag: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl WorkerStop {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Running worker: its submitter, a view of the latest decision, and its task.
pub struct ClassificationWorker {
    pub submitter: FrameSubmitter,
    pub decisions: watch::Receiver<Option<SequencedDecision>>,
    pub stop: WorkerStop,
    pub handle: JoinHandle<(EmotionPredictor, WorkerReport)>,
}

/// Spawn a worker on the current tokio runtime.
pub fn spawn_classification_worker(
    predictor: EmotionPredictor,
    deadline: Option<FrameDeadline>,
) -> ClassificationWorker {
    let (frame_tx, frame_rx) = watch::channel(None);
    let (decision_tx, decision_rx) = watch::channel(None);
    let stop = WorkerStop::default();

    let handle = tokio::spawn(run_worker(
        predictor,
        deadline,
        frame_rx,
        decision_tx,
        stop.clone(),
    ));

    ClassificationWorker {
        submitter: FrameSubmitter {
            tx: frame_tx,
            next_seq: 0,
        },
        decisions: decision_rx,
        stop,
        handle,
    }
}

async fn run_worker(
    mut predictor: EmotionPredictor,
    deadline: Option<FrameDeadline>,
    mut frames: watch::Receiver<Option<PendingFrame>>,
    decisions: watch::Sender<Option<SequencedDecision>>,
    stop: WorkerStop,
) -> (EmotionPredictor, WorkerReport) {
    let mut report = WorkerReport::default();
    let mut last_seen = 0u64;

    tracing::debug!(model = %predictor.model_name(), "Classification worker started");

    while !stop.is_stopped() {
        tokio::select! {
            biased;
            _ = stop.wake.notified() => break,
            changed = frames.changed() => {
                // Err means every submitter is gone and the last frame was already seen.
                if changed.is_err() {
                    break;
                }
            }
        }

        let pending = frames.borrow_and_update().clone();
        let Some(pending) = pending else { continue };
        if pending.seq <= last_seen {
            continue;
        }
        report.superseded += pending.seq - last_seen - 1;
        last_seen = pending.seq;

        if let Some(deadline) = deadline {
            if deadline.is_expired(pending.arrived, Instant::now()) {
                tracing::debug!(seq = pending.seq, "Dropping stale frame");
                report.stale += 1;
                continue;
            }
        }

        let record = predictor.on_frame(&pending.frame);
        report.processed += 1;
        report.last_seq = Some(pending.seq);
        decisions.send_replace(Some(SequencedDecision {
            seq: pending.seq,
            record,
        }));

        // Let producers run between frames.
        tokio::task::yield_now().await;
    }

    tracing::debug!(
        processed = report.processed,
        superseded = report.superseded,
        stale = report.stale,
        "Classification worker stopped"
    );
    (predictor, report)
}
