//! Replay a frames file through a model.

use std::path::PathBuf;

use emofeed_classifier_core::{ClassifierAdapter, SoftmaxModel};
use emofeed_common::clock::SessionClock;
use emofeed_common::config::{AppConfig, MissingFeaturePolicy};
use emofeed_face_model::{DecisionRecord, EMOTION_CLASSES};
use emofeed_face_tracker::sources::ReplaySource;
use emofeed_face_tracker::{
    spawn_classification_worker, ClassificationWorker, DecisionLogHeader, DecisionWriter,
    EmotionPredictor, EmotionTracker, TrackingSource,
};

pub struct ClassifyArgs {
    pub frames: PathBuf,
    pub model: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub substitute_missing: Option<f64>,
    pub output: Option<PathBuf>,
    pub quiet: bool,
    pub realtime: bool,
}

pub async fn run(mut config: AppConfig, args: ClassifyArgs) -> anyhow::Result<()> {
    if let Some(threshold) = args.threshold {
        config.decision.confidence_threshold = threshold;
    }
    if let Some(value) = args.substitute_missing {
        config.decision.missing_feature = MissingFeaturePolicy::Substitute { value };
    }
    config.validate()?;

    let model_path = args
        .model
        .or_else(|| config.model_path.clone())
        .ok_or_else(|| anyhow::anyhow!("No model given; pass --model or set model_path in config"))?;

    tracing::debug!(model = %model_path.display(), "Resolved model path");
    println!("Classifying frames from: {}", args.frames.display());

    let model = SoftmaxModel::load(&model_path)
        .map_err(|e| anyhow::anyhow!("Failed to load model: {e}"))?;
    let predictor = EmotionPredictor::from_config(ClassifierAdapter::new(Box::new(model)), &config.decision)?;

    let source = ReplaySource::from_file(&args.frames)
        .map_err(|e| anyhow::anyhow!("Failed to load frames: {e}"))?;
    if let Some(header) = source.header() {
        println!(
            "  Source: {} @ {} Hz (started {})",
            header.source, header.sample_rate_hz, header.epoch_wall
        );
    }
    println!("  Loaded {} frames", source.len());
    println!("  Model: {}", predictor.model_name());
    println!("  Threshold: {}", predictor.threshold().value());

    if source.is_empty() {
        println!("  No frames to classify.");
        return Ok(());
    }

    if args.realtime {
        return run_realtime(source, predictor, &config).await;
    }

    let mut tracker =
        EmotionTracker::new(Box::new(source), predictor).with_idle_poll(config.pipeline.idle_poll());

    if let Some(output) = &args.output {
        let header = DecisionLogHeader {
            schema_version: "1.0".to_string(),
            epoch_wall: SessionClock::start().epoch_wall().to_string(),
            model: tracker.predictor().model_name().to_string(),
            confidence_threshold: tracker.predictor().threshold().value(),
        };
        let writer = DecisionWriter::create(output, &header)
            .map_err(|e| anyhow::anyhow!("Failed to create decision log: {e}"))?;
        tracker = tracker.with_writer(writer);
    }

    if !args.quiet {
        tracker = tracker.with_observer(Box::new(|record: &DecisionRecord| {
            println!("{}", format_record(record));
        }));
    }

    let summary = tracker.run().await?;

    println!("\nFrames: {} ({} failed)", summary.frames, summary.failed);
    for emotion in EMOTION_CLASSES.iter().chain([emofeed_face_model::Emotion::Unknown].iter()) {
        println!("  {:<10} {}", emotion.as_str(), summary.stats.count(*emotion));
    }
    println!("Final label: {}", summary.final_label);

    if let Some(output) = &args.output {
        println!("Decisions saved to: {}", output.display());
    }

    Ok(())
}

/// Submit frames at their recorded times and let the worker keep up as it can.
async fn run_realtime(
    mut source: ReplaySource,
    predictor: EmotionPredictor,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let deadline = config.pipeline.frame_deadline();
    println!(
        "  Realtime replay (deadline: {})",
        deadline
            .map(|d| format!("{} ms", d.budget().as_millis()))
            .unwrap_or_else(|| "none".to_string())
    );

    let ClassificationWorker {
        mut submitter,
        mut decisions,
        stop,
        handle,
    } = spawn_classification_worker(predictor, deadline);

    let interrupt = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping worker");
            interrupt.stop();
        }
    });

    let printer = tokio::spawn(async move {
        while decisions.changed().await.is_ok() {
            let latest = decisions.borrow_and_update().clone();
            if let Some(decision) = latest {
                println!("#{:<5} {}", decision.seq, format_record(&decision.record));
            }
        }
    });

    source.start()?;
    let clock = SessionClock::start();
    let mut first_ts = None;
    while let Some(frame) = source.poll()? {
        if stop.is_stopped() {
            break;
        }
        let base = *first_ts.get_or_insert(frame.timestamp_ns);
        let due = clock.due_at(frame.timestamp_ns.saturating_sub(base));
        tokio::time::sleep_until(due.into()).await;
        submitter.submit(frame);
    }
    source.pause();
    let submitted = submitter.submitted();
    drop(submitter);

    let (predictor, report) = handle.await?;
    printer.await?;

    println!(
        "\nSubmitted: {submitted}  classified: {}  superseded: {}  stale: {}",
        report.processed, report.superseded, report.stale
    );
    println!("Final label: {}", predictor.current());
    Ok(())
}

fn format_record(record: &DecisionRecord) -> String {
    let secs = record.timestamp_secs();
    match (&record.scores, &record.error) {
        (_, Some(error)) => format!("{secs:>9.3}s  {:<10} ({error})", record.label.as_str()),
        (Some(scores), None) => {
            let rendered = scores
                .iter()
                .map(|s| format!("{s:.3}"))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{secs:>9.3}s  {:<10} [{rendered}]", record.label.as_str())
        }
        (None, None) => format!("{secs:>9.3}s  {}", record.label.as_str()),
    }
}
