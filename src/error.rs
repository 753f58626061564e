use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading the assets and ranking the
/// model output. Nothing is retried; the first error ends the classification.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed asset: {0}")]
    Format(String),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to resize image: {0}")]
    Resize(String),

    #[error("tensor shape mismatch: expected {expected:?}, found {found:?}")]
    Shape {
        expected: Vec<Option<usize>>,
        found: Vec<usize>,
    },

    #[error("graph execution failed: {0}")]
    Runtime(String),

    #[error("ranking needs {needed} classes but only {available} are available")]
    NotEnoughClasses { needed: usize, available: usize },
}

impl ClassifyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ClassifyError> = std::result::Result<T, E>;
