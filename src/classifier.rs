use std::fmt;
use std::path::Path;

use crate::config::AssetPaths;
use crate::error::{ClassifyError, Result};
use crate::inference::infer;
use crate::labels::load_labels;
use crate::model::{GraphRuntime, load_model};
use crate::postprocess::{Prediction, top_five};
use crate::preprocess::{PreprocessConfig, Processor};

/// A loaded model together with its vocabulary and input preprocessing.
pub struct Classifier {
    graph: Box<dyn GraphRuntime>,
    labels: Vec<String>,
    processor: Processor,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("graph", &self.graph.name())
            .field("labels", &self.labels.len())
            .field("processor", &self.processor)
            .finish()
    }
}

impl Classifier {
    pub fn new(graph: Box<dyn GraphRuntime>, labels: Vec<String>, processor: Processor) -> Self {
        Self {
            graph,
            labels,
            processor,
        }
    }

    /// Loads the inception5h graph and vocabulary from `paths`.
    pub fn from_paths(paths: &AssetPaths) -> Result<Self> {
        let config = PreprocessConfig::inception();
        let graph = load_model(&paths.model, config.input_shape())?;
        let labels = load_labels(&paths.labels)?;
        tracing::info!(
            model = %paths.model.display(),
            backend = graph.name(),
            classes = labels.len(),
            "classifier ready"
        );
        Ok(Self::new(graph, labels, Processor::new(config)))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Top five labels for an encoded image.
    pub fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>> {
        let input = self.processor.preprocess(image)?;
        let probabilities = infer(self.graph.as_ref(), input)?;
        top_five(&self.labels, &probabilities)
    }

    pub fn classify_file(&self, path: impl AsRef<Path>) -> Result<Vec<Prediction>> {
        let path = path.as_ref();
        let image = std::fs::read(path).map_err(|e| ClassifyError::io(path, e))?;
        self.classify(&image)
    }
}

/// Loads everything, classifies one image and drops the model again.
pub fn classify_image(paths: &AssetPaths, image: impl AsRef<Path>) -> Result<Vec<Prediction>> {
    Classifier::from_paths(paths)?.classify_file(image)
}
