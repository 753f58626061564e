//! Loading serialized classification graphs and running them.
//!
//! Both backends bind the nodes named [`INPUT_NODE`] and [`OUTPUT_NODE`], so
//! callers only ever see [`GraphRuntime`].

mod onnx;
mod tensorflow;

use std::path::Path;

use ndarray::{Array4, ArrayD};

use crate::error::{ClassifyError, Result};

pub use onnx::OnnxModel;
pub use tensorflow::TensorflowModel;

pub const INPUT_NODE: &str = "input";
pub const OUTPUT_NODE: &str = "output";

/// An executable, read-only graph with one float input and one float output.
pub trait GraphRuntime: Send + Sync {
    fn name(&self) -> &'static str;

    fn input_name(&self) -> &str;

    fn output_name(&self) -> &str;

    /// Declared input dimensions. `None` = dynamic.
    fn input_shape(&self) -> &[Option<usize>];

    /// Binds `input` to the input node, executes the graph and returns the
    /// tensor bound to the output node.
    fn run(&self, input: Array4<f32>) -> Result<ArrayD<f32>>;
}

/// On-disk encoding of a model graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphFormat {
    /// Frozen TensorFlow `GraphDef` protobuf.
    TensorflowFrozen,
    Onnx,
}

impl GraphFormat {
    /// Picks the format from the file extension; anything that is not `.onnx`
    /// is treated as a frozen TensorFlow graph.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("onnx") => Self::Onnx,
            _ => Self::TensorflowFrozen,
        }
    }
}

/// Reads and parses the graph at `model_path`.
///
/// `input_shape` pins the input node for backends that need a concrete shape
/// before optimizing.
pub fn load_model(
    model_path: impl AsRef<Path>,
    input_shape: [usize; 4],
) -> Result<Box<dyn GraphRuntime>> {
    let model_path = model_path.as_ref();
    let bytes = std::fs::read(model_path).map_err(|e| ClassifyError::io(model_path, e))?;
    let format = GraphFormat::from_path(model_path);

    let t = std::time::Instant::now();
    let model: Box<dyn GraphRuntime> = match format {
        GraphFormat::TensorflowFrozen => Box::new(TensorflowModel::from_bytes(&bytes, input_shape)?),
        GraphFormat::Onnx => Box::new(OnnxModel::from_bytes(&bytes)?),
    };
    tracing::debug!(
        path = %model_path.display(),
        backend = model.name(),
        size = bytes.len(),
        elapsed = ?t.elapsed(),
        "loaded model"
    );
    Ok(model)
}
