use std::cmp::Reverse;
use std::fmt;

use ordered_float::OrderedFloat;

use crate::error::{ClassifyError, Result};

/// Number of predictions reported per image.
pub const TOP_K: usize = 5;

/// One class of the ranked output.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.label, self.probability * 100.0)
    }
}

/// Pairs `probabilities[i]` with `labels[i]`. Whichever side is longer is cut
/// to the shorter one.
pub fn pair_labels(labels: &[String], probabilities: &[f32]) -> Vec<Prediction> {
    labels
        .iter()
        .zip(probabilities)
        .map(|(label, &probability)| Prediction {
            label: label.clone(),
            probability,
        })
        .collect()
}

/// Sorts by descending probability. The sort is stable, so equal
/// probabilities keep vocabulary order. NaN scores go last.
pub fn rank(predictions: &mut [Prediction]) {
    predictions.sort_by_key(|p| (p.probability.is_nan(), Reverse(OrderedFloat(p.probability))));
}

/// The `k` most probable labels, best first.
pub fn top_k(labels: &[String], probabilities: &[f32], k: usize) -> Result<Vec<Prediction>> {
    let mut predictions = pair_labels(labels, probabilities);
    if predictions.len() < k {
        return Err(ClassifyError::NotEnoughClasses {
            needed: k,
            available: predictions.len(),
        });
    }
    rank(&mut predictions);
    predictions.truncate(k);
    Ok(predictions)
}

pub fn top_five(labels: &[String], probabilities: &[f32]) -> Result<Vec<Prediction>> {
    top_k(labels, probabilities, TOP_K)
}
