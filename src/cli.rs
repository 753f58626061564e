use std::path::PathBuf;

use clap::Parser;

use crate::config::{AssetPaths, DEFAULT_IMAGE_PATH, DEFAULT_LABELS_PATH, DEFAULT_MODEL_PATH};

#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Frozen TensorFlow graph (.pb) or ONNX model (.onnx)
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// label vocabulary, one class per line
    #[arg(long, default_value = DEFAULT_LABELS_PATH)]
    pub labels: PathBuf,

    /// image path
    #[arg(long, default_value = DEFAULT_IMAGE_PATH)]
    pub source: PathBuf,
}

impl Args {
    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths {
            model: self.model.clone(),
            labels: self.labels.clone(),
        }
    }
}
