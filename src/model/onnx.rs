use ndarray::{Array4, ArrayD};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::{Session, SessionInputValue};
use ort::value::{Tensor, ValueType};

use super::{GraphRuntime, INPUT_NODE, OUTPUT_NODE};
use crate::error::{ClassifyError, Result};

/// ONNX graph executed by ONNX Runtime on the CPU provider.
pub struct OnnxModel {
    session: Session,
    input_shape: Vec<Option<usize>>,
}

impl OnnxModel {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.commit_from_memory(bytes))
            .map_err(|e| ClassifyError::Format(format!("onnx graph: {e}")))?;

        let input = session
            .inputs
            .iter()
            .find(|input| input.name == INPUT_NODE)
            .ok_or_else(|| ClassifyError::Format(format!("onnx graph has no `{INPUT_NODE}` input")))?;
        let ValueType::Tensor { dimensions, .. } = &input.input_type else {
            return Err(ClassifyError::Format(format!("`{INPUT_NODE}` is not a tensor")));
        };
        let input_shape = dimensions.iter().map(|d| usize::try_from(*d).ok()).collect();

        if !session.outputs.iter().any(|output| output.name == OUTPUT_NODE) {
            return Err(ClassifyError::Format(format!(
                "onnx graph has no `{OUTPUT_NODE}` output"
            )));
        }

        Ok(Self {
            session,
            input_shape,
        })
    }
}

impl GraphRuntime for OnnxModel {
    fn name(&self) -> &'static str {
        "onnxruntime"
    }

    fn input_name(&self) -> &str {
        INPUT_NODE
    }

    fn output_name(&self) -> &str {
        OUTPUT_NODE
    }

    fn input_shape(&self) -> &[Option<usize>] {
        &self.input_shape
    }

    fn run(&self, input: Array4<f32>) -> Result<ArrayD<f32>> {
        let value = Tensor::from_array(input).map_err(|e| ClassifyError::Runtime(e.to_string()))?;
        let inputs = vec![(INPUT_NODE.to_string(), SessionInputValue::from(value.into_dyn()))];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| ClassifyError::Runtime(e.to_string()))?;
        let output = outputs
            .get(OUTPUT_NODE)
            .ok_or_else(|| ClassifyError::Runtime(format!("no tensor bound to `{OUTPUT_NODE}`")))?;

        let probabilities = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifyError::Runtime(format!("{OUTPUT_NODE}: {e}")))?;
        Ok(probabilities.into_owned())
    }
}
