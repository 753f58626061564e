use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use inception_classify::{Args, Classifier};

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let classifier = Classifier::from_paths(&args.asset_paths())
        .context("failed to load the classification model")?;
    tracing::debug!(classes = classifier.labels().len(), "vocabulary loaded");

    let t = std::time::Instant::now();
    let response = classifier
        .classify_file(&args.source)
        .with_context(|| format!("failed to classify {}", args.source.display()))?;
    tracing::info!(elapsed = ?t.elapsed(), "response: {:?}", response);

    for prediction in &response {
        tracing::info!("{prediction}");
    }
    Ok(())
}
