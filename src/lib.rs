pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod labels;
pub mod model;
pub mod postprocess;
pub mod preprocess;

pub use crate::classifier::{Classifier, classify_image};
pub use crate::cli::Args;
pub use crate::config::AssetPaths;
pub use crate::error::{ClassifyError, Result};
pub use crate::inference::infer;
pub use crate::labels::load_labels;
pub use crate::model::{GraphFormat, GraphRuntime, OnnxModel, TensorflowModel, load_model};
pub use crate::postprocess::{Prediction, TOP_K, top_five, top_k};
pub use crate::preprocess::{PreprocessConfig, Processor};
