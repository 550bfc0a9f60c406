//! Print the canonical feature order.

use emofeed_classifier_core::FeatureLayout;

pub fn run() -> anyhow::Result<()> {
    let layout = FeatureLayout::arkit();
    println!("Canonical feature order ({} features):", layout.len());
    for (i, name) in layout.names().iter().enumerate() {
        println!("  {i:>2}  {name}");
    }
    Ok(())
}
