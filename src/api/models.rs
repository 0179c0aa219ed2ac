// API request and response models
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::{DataSet, Value};
use crate::processing::ColumnStats;
use crate::session::Outcome;

/// Default number of rows in a preview
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Query parameters of the dataset preview
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewQuery {
    pub limit: Option<usize>,
}

/// First rows of the current table
#[derive(Debug, Clone, Serialize)]
pub struct DatasetPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
    pub total_rows: usize,
}

impl DatasetPreview {
    /// Build a preview of at most `limit` rows
    pub fn new(data: &DataSet, limit: usize) -> Self {
        DatasetPreview {
            columns: data.column_names().into_iter().map(str::to_string).collect(),
            rows: data
                .data
                .iter()
                .take(limit)
                .map(|row| row.values.iter().map(to_json).collect())
                .collect(),
            total_rows: data.len(),
        }
    }
}

/// JSON form of a cell; missing values become `null`
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Integer(i) => JsonValue::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
    }
}

/// Statistics of one column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDescription {
    pub column: String,
    #[serde(flatten)]
    pub stats: ColumnStats,
}

/// One distinct value and its frequency
#[derive(Debug, Clone, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Result of a committed operation or upload
#[derive(Debug, Clone, Serialize)]
pub struct OperationResponse {
    pub operation: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}
