// Processing module: column-level operators over a dataset
// Author: Gabriel Demetrios Lafis

mod encode;
mod impute;
mod prune;
mod stats;
mod summary;
mod text;
mod tfidf;

pub use encode::*;
pub use impute::*;
pub use prune::*;
pub use stats::*;
pub use summary::*;
pub use text::*;
pub use tfidf::*;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::data::{ColumnType, DataError, DataSet, Field, Row, Schema, Value};

/// Represents a data processor that transforms data.
///
/// Processors never mutate their input: they build and return a new
/// dataset, and the caller decides whether to commit it.
pub trait DataProcessor {
    /// Process a dataset and return a new dataset
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError>;

    /// Get the processor name
    fn name(&self) -> &str;

    /// Columns the processor reads or rewrites
    fn target_columns(&self) -> Vec<String>;

    /// Parameters of this invocation, for the operation log
    fn parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Human-readable description of this invocation
    fn describe(&self) -> String;
}

/// Represents an error raised by an operator
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Method '{method}' is not valid for {column_type} column '{column}'")]
    InvalidMethod {
        column: String,
        method: String,
        column_type: String,
    },
    #[error("Column '{0}' has no non-missing values")]
    EmptyColumn(String),
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Column '{column}' has unsupported type {column_type} for {operation}")]
    UnsupportedColumnType {
        column: String,
        column_type: ColumnType,
        operation: String,
    },
    #[error("Row count mismatch: table has {expected} rows, new columns have {got}")]
    RowMismatch { expected: usize, got: usize },
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Find a column by name
pub(crate) fn column_index(input: &DataSet, column: &str) -> Result<usize, PipelineError> {
    input
        .schema
        .index_of(column)
        .ok_or_else(|| PipelineError::ColumnNotFound(column.to_string()))
}

/// Build a dataset that keeps the input's metadata
pub(crate) fn derive_dataset(
    input: &DataSet,
    schema: Schema,
    rows: Vec<Row>,
) -> Result<DataSet, PipelineError> {
    let mut result = DataSet::from_rows(schema, rows)?;

    for (key, value) in &input.metadata.properties {
        result.metadata.add(key.clone(), value.clone());
    }

    Ok(result)
}

/// Replace the values of one column, keeping its name and position
pub(crate) fn replace_column(
    input: &DataSet,
    index: usize,
    values: Vec<Value>,
) -> Result<DataSet, PipelineError> {
    if values.len() != input.len() {
        return Err(PipelineError::RowMismatch {
            expected: input.len(),
            got: values.len(),
        });
    }

    let rows = input
        .data
        .iter()
        .zip(values)
        .map(|(row, value)| {
            let mut values = row.values.clone();
            values[index] = value;
            Row::new(values)
        })
        .collect();

    derive_dataset(input, input.schema.clone(), rows)
}

/// Append new columns positionally, after dropping the columns in `drop`.
///
/// Every new column must have exactly one value per input row, and no new
/// name may collide with a remaining column.
pub(crate) fn append_columns(
    input: &DataSet,
    drop: &[usize],
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
) -> Result<DataSet, PipelineError> {
    if let Some(column) = columns.iter().find(|c| c.len() != input.len()) {
        return Err(PipelineError::RowMismatch {
            expected: input.len(),
            got: column.len(),
        });
    }

    let keep: Vec<usize> = (0..input.column_count())
        .filter(|i| !drop.contains(i))
        .collect();

    let mut fields: Vec<Field> = keep
        .iter()
        .map(|&i| input.schema.fields[i].clone())
        .collect();

    for name in &names {
        if fields.iter().any(|f| &f.name == name) {
            return Err(PipelineError::DuplicateColumn(name.clone()));
        }
        fields.push(Field::new(name.clone()));
    }

    let rows = input
        .data
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let mut values: Vec<Value> = keep.iter().map(|&i| row.values[i].clone()).collect();
            values.extend(columns.iter().map(|column| column[r].clone()));
            Row::new(values)
        })
        .collect();

    derive_dataset(input, Schema::new(fields), rows)
}
