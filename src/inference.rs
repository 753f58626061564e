use ndarray::{Array4, Axis, Ix2};

use crate::error::{ClassifyError, Result};
use crate::model::GraphRuntime;

/// Runs one forward pass and returns the probability row of the single image
/// in the batch.
///
/// The input must agree with every static dimension the graph declares, and
/// the output must be a `[1, N]` matrix.
pub fn infer(graph: &dyn GraphRuntime, input: Array4<f32>) -> Result<Vec<f32>> {
    check_input_shape(graph.input_shape(), input.shape())?;

    let t = std::time::Instant::now();
    let output = graph.run(input)?;
    tracing::debug!(
        backend = graph.name(),
        input = graph.input_name(),
        output = graph.output_name(),
        shape = ?output.shape(),
        elapsed = ?t.elapsed(),
        "graph executed"
    );

    let found = output.shape().to_vec();
    let output = output.into_dimensionality::<Ix2>().map_err(|_| ClassifyError::Shape {
        expected: vec![Some(1), None],
        found: found.clone(),
    })?;
    if output.nrows() == 0 {
        return Err(ClassifyError::Shape {
            expected: vec![Some(1), None],
            found,
        });
    }
    Ok(output.index_axis(Axis(0), 0).to_vec())
}

fn check_input_shape(expected: &[Option<usize>], found: &[usize]) -> Result<()> {
    let matches = expected.len() == found.len()
        && expected
            .iter()
            .zip(found)
            .all(|(e, f)| e.is_none_or(|e| e == *f));
    if matches {
        Ok(())
    } else {
        Err(ClassifyError::Shape {
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;

    struct Fixed {
        input_shape: Vec<Option<usize>>,
        output: ArrayD<f32>,
    }

    impl GraphRuntime for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn input_name(&self) -> &str {
            "input"
        }

        fn output_name(&self) -> &str {
            "output"
        }

        fn input_shape(&self) -> &[Option<usize>] {
            &self.input_shape
        }

        fn run(&self, _input: Array4<f32>) -> Result<ArrayD<f32>> {
            Ok(self.output.clone())
        }
    }

    fn fixed(output_shape: &[usize], values: Vec<f32>) -> Fixed {
        Fixed {
            input_shape: vec![Some(1), Some(4), Some(4), Some(3)],
            output: ArrayD::from_shape_vec(IxDyn(output_shape), values).unwrap(),
        }
    }

    #[test]
    fn returns_first_row() {
        let graph = fixed(&[1, 3], vec![0.1, 0.9, 0.05]);
        let probabilities = infer(&graph, Array4::zeros((1, 4, 4, 3))).unwrap();
        assert_eq!(probabilities, vec![0.1, 0.9, 0.05]);
    }

    #[test]
    fn only_row_zero_is_used() {
        let graph = fixed(&[2, 2], vec![0.3, 0.7, 0.6, 0.4]);
        let probabilities = infer(&graph, Array4::zeros((1, 4, 4, 3))).unwrap();
        assert_eq!(probabilities, vec![0.3, 0.7]);
    }

    #[test]
    fn rejects_mismatched_input() {
        let graph = fixed(&[1, 3], vec![0.1, 0.9, 0.05]);
        let err = infer(&graph, Array4::zeros((1, 5, 4, 3))).unwrap_err();
        match err {
            ClassifyError::Shape { found, .. } => assert_eq!(found, vec![1, 5, 4, 3]),
            other => panic!("expected Shape error, got {other:?}"),
        }
    }

    #[test]
    fn dynamic_dimensions_accept_anything() {
        let mut graph = fixed(&[1, 2], vec![0.5, 0.5]);
        graph.input_shape = vec![None, None, None, Some(3)];
        assert!(infer(&graph, Array4::zeros((1, 9, 7, 3))).is_ok());
    }

    #[test]
    fn rejects_non_matrix_output() {
        let graph = fixed(&[3], vec![0.1, 0.9, 0.05]);
        let err = infer(&graph, Array4::zeros((1, 4, 4, 3))).unwrap_err();
        assert!(matches!(err, ClassifyError::Shape { .. }), "got {err:?}");
    }
}
