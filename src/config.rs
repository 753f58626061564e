use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str =
    "assets/model_files/inception5h/tensorflow_inception_graph.pb";
pub const DEFAULT_LABELS_PATH: &str =
    "assets/model_files/inception5h/imagenet_comp_graph_label_strings.txt";
pub const DEFAULT_IMAGE_PATH: &str = "assets/images/cat.jpeg";

/// Where the static model assets live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    pub model: PathBuf,
    pub labels: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_PATH.into(),
            labels: DEFAULT_LABELS_PATH.into(),
        }
    }
}
