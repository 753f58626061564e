use ndarray::{Array4, ArrayD, IxDyn};
use tract_tensorflow::prelude::{
    Datum, Framework, InferenceModelExt, Tensor, TypedModel, TypedRunnableModel, tvec,
};

use super::{GraphRuntime, INPUT_NODE, OUTPUT_NODE};
use crate::error::{ClassifyError, Result};

/// Frozen TensorFlow graph executed by tract.
pub struct TensorflowModel {
    plan: TypedRunnableModel<TypedModel>,
    input_shape: Vec<Option<usize>>,
}

impl TensorflowModel {
    /// Parses a `GraphDef`, rebinds its inputs and outputs to the `input` /
    /// `output` nodes and optimizes it for an `f32` input of `input_shape`.
    pub fn from_bytes(bytes: &[u8], input_shape: [usize; 4]) -> Result<Self> {
        let plan = tract_tensorflow::tensorflow()
            .model_for_read(&mut &*bytes)
            .and_then(|model| model.with_input_names([INPUT_NODE]))
            .and_then(|model| model.with_output_names([OUTPUT_NODE]))
            .and_then(|model| model.with_input_fact(0, f32::fact(input_shape).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifyError::Format(format!("tensorflow graph: {e:#}")))?;

        Ok(Self {
            plan,
            input_shape: input_shape.iter().copied().map(Some).collect(),
        })
    }
}

impl GraphRuntime for TensorflowModel {
    fn name(&self) -> &'static str {
        "tract-tensorflow"
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
        let shape = input.shape().to_vec();
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape(&shape, &data)
            .map_err(|e| ClassifyError::Runtime(format!("{e:#}")))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| ClassifyError::Runtime(format!("{e:#}")))?;
        let output = outputs
            .first()
            .ok_or_else(|| ClassifyError::Runtime(format!("no tensor bound to `{OUTPUT_NODE}`")))?;

        let values = output
            .as_slice::<f32>()
            .map_err(|e| ClassifyError::Runtime(format!("{OUTPUT_NODE}: {e:#}")))?;
        ArrayD::from_shape_vec(IxDyn(output.shape()), values.to_vec())
            .map_err(|e| ClassifyError::Runtime(e.to_string()))
    }
}
