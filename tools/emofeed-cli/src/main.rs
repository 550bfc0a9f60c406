//! Emofeed CLI — Command-line interface for replaying and classifying
//! face-tracking frames.
//!
//! Usage:
//!   emofeed classify <FRAMES> [OPTIONS]   Replay frames and print labels
//!   emofeed classify <FRAMES> --realtime  Replay at tracker speed, dropping late frames
//!   emofeed model <PATH>                  Validate a model artifact
//!   emofeed features                      Show the canonical feature order
//!   emofeed config [--init]               Show or create the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "emofeed",
    about = "Facial-expression emotion classification from face-tracking frames",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a frames JSONL file through a model
    Classify {
        /// Path to the frames file
        frames: PathBuf,

        /// Model artifact (defaults to `model_path` from config)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Confidence threshold [0.0, 1.0] (defaults to config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Fill missing features with this value instead of failing the frame
        #[arg(long)]
        substitute_missing: Option<f64>,

        /// Write decisions as JSONL
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only print the summary
        #[arg(short, long)]
        quiet: bool,

        /// Pace frames by their timestamps through the latest-wins worker
        #[arg(long, conflicts_with = "output")]
        realtime: bool,
    },

    /// Validate a model artifact and show its shape
    Model {
        /// Path to the model file
        path: PathBuf,
    },

    /// Show the canonical feature order
    Features,

    /// Show the effective configuration
    Config {
        /// Write the default config to the standard location
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = emofeed_common::config::AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    emofeed_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Classify {
            frames,
            model,
            threshold,
            substitute_missing,
            output,
            quiet,
            realtime,
        } => {
            commands::classify::run(
                config,
                commands::classify::ClassifyArgs {
                    frames,
                    model,
                    threshold,
                    substitute_missing,
                    output,
                    quiet,
                    realtime,
                },
            )
            .await
        }
        Commands::Model { path } => commands::model::run(path),
        Commands::Features => commands::features::run(),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
