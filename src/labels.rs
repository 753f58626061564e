use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ClassifyError, Result};

/// Reads the label vocabulary, one class per line.
///
/// Line `i` names output position `i` of the model, so lines are kept verbatim
/// (only the `\n` / `\r\n` terminator is stripped) and in file order.
pub fn load_labels(file_path: impl AsRef<Path>) -> Result<Vec<String>> {
    let file_path = file_path.as_ref();
    let file = File::open(file_path).map_err(|e| ClassifyError::io(file_path, e))?;
    let reader = BufReader::new(file);

    let labels = reader
        .lines()
        .enumerate()
        .map(|(id, line)| {
            line.map_err(|e| match e.kind() {
                std::io::ErrorKind::InvalidData => ClassifyError::Format(format!(
                    "{}: line {} is not valid UTF-8",
                    file_path.display(),
                    id + 1
                )),
                _ => ClassifyError::io(file_path, e),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(path = %file_path.display(), count = labels.len(), "loaded labels");
    Ok(labels)
}
