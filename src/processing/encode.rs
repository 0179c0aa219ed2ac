// Categorical encoding
// Author: Gabriel Demetrios Lafis

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use super::{append_columns, column_index, replace_column};
use super::{DataProcessor, PipelineError};
use crate::data::{ColumnType, DataSet, Value};

/// Text form a missing value takes when a column is encoded as text
const MISSING_LABEL: &str = "nan";

/// Replace a column by integer codes of its values' text forms.
///
/// Codes are 0-based and follow the ascending order of the distinct text
/// forms, so the same column always yields the same codes.
pub struct LabelEncode {
    column: String,
}

impl LabelEncode {
    /// Create a new label encoder for a column
    pub fn new(column: &str) -> Self {
        LabelEncode {
            column: column.to_string(),
        }
    }

    /// Distinct labels of the column in code order
    pub fn classes(&self, input: &DataSet) -> Result<Vec<String>, PipelineError> {
        let index = column_index(input, &self.column)?;
        let classes: BTreeSet<String> = input.column_values(index).map(label_of).collect();
        Ok(classes.into_iter().collect())
    }
}

fn label_of(value: &Value) -> String {
    value.as_text().unwrap_or_else(|| MISSING_LABEL.to_string())
}

impl DataProcessor for LabelEncode {
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError> {
        let index = column_index(input, &self.column)?;

        let codes: BTreeMap<String, i64> = self
            .classes(input)?
            .into_iter()
            .zip(0..)
            .collect();
        debug!("Label encoding '{}' with {} classes", self.column, codes.len());

        let values = input
            .column_values(index)
            .map(|v| Value::Integer(codes[&label_of(v)]))
            .collect();

        replace_column(input, index, values)
    }

    fn name(&self) -> &str {
        "label_encode"
    }

    fn target_columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn describe(&self) -> String {
        format!("Label encoded '{}'", self.column)
    }
}

/// Expand a categorical column into one boolean column per distinct value.
///
/// New columns are named `<column>_<value>`, ordered by value, and appended
/// after the remaining columns; the source column is removed. Missing values
/// get `false` in every indicator column.
pub struct OneHotEncode {
    column: String,
}

impl OneHotEncode {
    /// Create a new one-hot encoder for a column
    pub fn new(column: &str) -> Self {
        OneHotEncode {
            column: column.to_string(),
        }
    }
}

impl DataProcessor for OneHotEncode {
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError> {
        let index = column_index(input, &self.column)?;

        let column_type = ColumnType::from(input.dtype(index));
        if column_type == ColumnType::Numeric {
            return Err(PipelineError::UnsupportedColumnType {
                column: self.column.clone(),
                column_type,
                operation: "one-hot encoding".to_string(),
            });
        }

        let categories: BTreeSet<String> =
            input.column_values(index).filter_map(Value::as_text).collect();
        debug!("One-hot encoding '{}' into {} columns", self.column, categories.len());

        let names = categories
            .iter()
            .map(|category| format!("{}_{}", self.column, category))
            .collect();

        let columns = categories
            .iter()
            .map(|category| {
                input
                    .column_values(index)
                    .map(|v| Value::Boolean(v.as_text().as_deref() == Some(category.as_str())))
                    .collect()
            })
            .collect();

        append_columns(input, &[index], names, columns)
    }

    fn name(&self) -> &str {
        "one_hot_encode"
    }

    fn target_columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn describe(&self) -> String {
        format!("One-hot encoded '{}'", self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Row, Schema};

    fn cities() -> DataSet {
        let city = |s: &str| Value::String(s.to_string());
        DataSet::from_rows(
            Schema::from_names(["city", "pop"]),
            vec![
                Row::new(vec![city("NY"), Value::Integer(8)]),
                Row::new(vec![city("NY"), Value::Integer(8)]),
                Row::new(vec![city("LA"), Value::Integer(4)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_label_encode_sorted_codes() {
        let result = LabelEncode::new("city").process(&cities()).unwrap();

        let codes: Vec<&Value> = result.column_values(0).collect();
        assert_eq!(codes, vec![&Value::Integer(1), &Value::Integer(1), &Value::Integer(0)]);
        assert_eq!(result.column_type("city"), Some(ColumnType::Numeric));
        assert_eq!(result.shape(), (3, 2));
    }

    #[test]
    fn test_label_encode_is_deterministic() {
        let first = LabelEncode::new("city").process(&cities()).unwrap();
        let second = LabelEncode::new("city").process(&cities()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_label_encode_missing_gets_its_own_code() {
        let mut input = cities();
        input.data[2].values[0] = Value::Null;

        let encoder = LabelEncode::new("city");
        assert_eq!(encoder.classes(&input).unwrap(), vec!["NY", "nan"]);

        let result = encoder.process(&input).unwrap();
        assert_eq!(result.data[2].values[0], Value::Integer(1));
    }

    #[test]
    fn test_one_hot_encode() {
        let result = OneHotEncode::new("city").process(&cities()).unwrap();

        assert_eq!(result.column_names(), vec!["pop", "city_LA", "city_NY"]);
        assert_eq!(result.len(), 3);
        assert_eq!(
            result.data[0].values,
            vec![Value::Integer(8), Value::Boolean(false), Value::Boolean(true)]
        );
        assert_eq!(result.column_type("city_LA"), Some(ColumnType::Boolean));
    }

    #[test]
    fn test_one_hot_missing_is_all_false() {
        let mut input = cities();
        input.data[1].values[0] = Value::Null;

        let result = OneHotEncode::new("city").process(&input).unwrap();
        assert_eq!(result.column_count(), 3);
        assert_eq!(&result.data[1].values[1..], &[Value::Boolean(false), Value::Boolean(false)]);
    }

    #[test]
    fn test_one_hot_rejects_numeric() {
        let err = OneHotEncode::new("pop").process(&cities()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnsupportedColumnType { column_type: ColumnType::Numeric, .. }
        ));
    }

    #[test]
    fn test_one_hot_name_collision() {
        let mut input = cities();
        input.schema.fields[1].name = "city_LA".to_string();

        let err = OneHotEncode::new("city").process(&input).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateColumn(_)));
    }
}
