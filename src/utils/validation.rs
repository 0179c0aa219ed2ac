// Validation utilities
// Author: Gabriel Demetrios Lafis

use crate::data::DataSet;
use crate::processing::PipelineError;

/// Resolve a user column selection to column positions.
///
/// The selection must be non-empty and every name must exist. Repeated names
/// resolve to a single position.
pub fn validate_selection(dataset: &DataSet, columns: &[String]) -> Result<Vec<usize>, PipelineError> {
    if columns.is_empty() {
        return Err(PipelineError::InvalidSelection(
            "at least one column must be selected".to_string(),
        ));
    }

    let mut indices = Vec::with_capacity(columns.len());
    for name in columns {
        let index = dataset.schema.index_of(name).ok_or_else(|| {
            PipelineError::InvalidSelection(format!("column '{}' not found", name))
        })?;

        if !indices.contains(&index) {
            indices.push(index);
        }
    }

    Ok(indices)
}
