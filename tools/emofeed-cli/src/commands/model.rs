//! Validate a model artifact.

use std::path::PathBuf;

use emofeed_classifier_core::{FeatureLayout, SoftmaxModel};
use emofeed_face_model::EMOTION_CLASSES;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating model at: {}", path.display());

    let model =
        SoftmaxModel::load(&path).map_err(|e| anyhow::anyhow!("Failed to load model: {e}"))?;

    println!("  Name: {}", model.name);
    println!("  Format version: {}", model.format_version);
    println!("  Inputs: {}", model.input_len);
    println!(
        "  Outputs: {}",
        EMOTION_CLASSES
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let layout = FeatureLayout::arkit();
    if model.input_len == layout.len() {
        println!("\nModel matches the {}-feature ARKit layout.", layout.len());
    } else {
        println!(
            "\nModel expects {} inputs but the ARKit layout has {}; frames will fail.",
            model.input_len,
            layout.len()
        );
    }

    Ok(())
}
