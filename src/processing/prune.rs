// Row and column removal
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{derive_dataset, DataProcessor, PipelineError};
use crate::data::{DataSet, Field, Row, Schema};
use crate::utils::validate_selection;

/// Condition under which a row is removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "how", content = "columns")]
pub enum RowPolicy {
    /// Drop rows with at least one missing value
    AnyNull,
    /// Drop rows where every value is missing
    AllNull,
    /// Drop rows with a missing value in any of the listed columns
    Subset(Vec<String>),
}

/// Remove rows matching a missing-value policy
pub struct DropRows {
    policy: RowPolicy,
}

impl DropRows {
    /// Create a new row removal processor
    pub fn new(policy: RowPolicy) -> Self {
        DropRows { policy }
    }

    /// Remove the matching rows and report how many were removed
    pub fn prune(&self, input: &DataSet) -> Result<(DataSet, usize), PipelineError> {
        let keep: Box<dyn Fn(&Row) -> bool> = match &self.policy {
            RowPolicy::AnyNull => Box::new(|row: &Row| !row.any_missing()),
            RowPolicy::AllNull => Box::new(|row: &Row| !row.all_missing()),
            RowPolicy::Subset(columns) => {
                let indices = validate_selection(input, columns)?;
                Box::new(move |row: &Row| {
                    indices
                        .iter()
                        .all(|&i| row.get(i).map_or(false, |v| !v.is_missing()))
                })
            }
        };

        let rows: Vec<Row> = input.data.iter().filter(|row| keep(*row)).cloned().collect();
        let removed = input.len() - rows.len();

        let result = derive_dataset(input, input.schema.clone(), rows)?;
        Ok((result, removed))
    }
}

impl DataProcessor for DropRows {
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError> {
        self.prune(input).map(|(result, _)| result)
    }

    fn name(&self) -> &str {
        "drop_rows"
    }

    fn target_columns(&self) -> Vec<String> {
        match &self.policy {
            RowPolicy::Subset(columns) => columns.clone(),
            RowPolicy::AnyNull | RowPolicy::AllNull => Vec::new(),
        }
    }

    fn parameters(&self) -> BTreeMap<String, String> {
        let how = match self.policy {
            RowPolicy::AnyNull => "any_null",
            RowPolicy::AllNull => "all_null",
            RowPolicy::Subset(_) => "subset",
        };
        BTreeMap::from([("how".to_string(), how.to_string())])
    }

    fn describe(&self) -> String {
        match &self.policy {
            RowPolicy::AnyNull => "Dropped rows with any missing value".to_string(),
            RowPolicy::AllNull => "Dropped rows with all values missing".to_string(),
            RowPolicy::Subset(columns) => {
                format!("Dropped rows with missing values in {}", columns.join(", "))
            }
        }
    }
}

/// Drop columns from a dataset
pub struct DropColumns {
    columns: Vec<String>,
}

impl DropColumns {
    /// Create a new drop columns processor
    pub fn new(columns: Vec<String>) -> Self {
        DropColumns { columns }
    }
}

impl DataProcessor for DropColumns {
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError> {
        let drop = validate_selection(input, &self.columns)?;

        let keep: Vec<usize> = (0..input.column_count())
            .filter(|i| !drop.contains(i))
            .collect();

        let fields: Vec<Field> = keep
            .iter()
            .map(|&i| input.schema.fields[i].clone())
            .collect();

        let rows = input
            .data
            .iter()
            .map(|row| Row::new(keep.iter().map(|&i| row.values[i].clone()).collect()))
            .collect();

        derive_dataset(input, Schema::new(fields), rows)
    }

    fn name(&self) -> &str {
        "drop_columns"
    }

    fn target_columns(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn describe(&self) -> String {
        format!("Dropped columns: {}", self.columns.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn sample() -> DataSet {
        DataSet::from_rows(
            Schema::from_names(["id", "name", "score"]),
            vec![
                Row::new(vec![
                    Value::Integer(1),
                    Value::String("a".to_string()),
                    Value::Float(1.0),
                ]),
                Row::new(vec![Value::Integer(2), Value::Null, Value::Float(2.0)]),
                Row::new(vec![
                    Value::Integer(3),
                    Value::String("c".to_string()),
                    Value::Float(3.0),
                ]),
                Row::new(vec![Value::Null, Value::Null, Value::Float(f64::NAN)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_drop_any_null() {
        let mut input = sample();
        input.data.truncate(3);

        let (result, removed) = DropRows::new(RowPolicy::AnyNull).prune(&input).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(removed, 1);
        assert_eq!(result.column_count(), 3);
    }

    #[test]
    fn test_drop_all_null() {
        let (result, removed) = DropRows::new(RowPolicy::AllNull).prune(&sample()).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_drop_subset() {
        let policy = RowPolicy::Subset(vec!["id".to_string()]);
        let (result, removed) = DropRows::new(policy).prune(&sample()).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_subset_must_be_valid() {
        let empty = DropRows::new(RowPolicy::Subset(vec![])).prune(&sample());
        assert!(matches!(empty, Err(PipelineError::InvalidSelection(_))));

        let unknown = DropRows::new(RowPolicy::Subset(vec!["zzz".to_string()])).prune(&sample());
        assert!(matches!(unknown, Err(PipelineError::InvalidSelection(_))));
    }

    #[test]
    fn test_pruning_to_empty_table_is_allowed() {
        let input = DataSet::from_rows(
            Schema::from_names(["x"]),
            vec![Row::new(vec![Value::Null])],
        )
        .unwrap();

        let (result, removed) = DropRows::new(RowPolicy::AnyNull).prune(&input).unwrap();
        assert!(result.is_empty());
        assert_eq!(removed, 1);
        assert_eq!(result.column_count(), 1);
    }

    #[test]
    fn test_drop_columns() {
        let result = DropColumns::new(vec!["name".to_string(), "id".to_string()])
            .process(&sample())
            .unwrap();

        assert_eq!(result.column_names(), vec!["score"]);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_drop_columns_requires_valid_selection() {
        let empty = DropColumns::new(vec![]).process(&sample());
        assert!(matches!(empty, Err(PipelineError::InvalidSelection(_))));

        let unknown = DropColumns::new(vec!["id".to_string(), "zzz".to_string()]).process(&sample());
        assert!(matches!(unknown, Err(PipelineError::InvalidSelection(_))));
    }

    #[test]
    fn test_policy_json_shape() {
        let policy: RowPolicy =
            serde_json::from_str(r#"{"how":"subset","columns":["a","b"]}"#).unwrap();
        assert_eq!(policy, RowPolicy::Subset(vec!["a".to_string(), "b".to_string()]));

        let policy: RowPolicy = serde_json::from_str(r#"{"how":"any_null"}"#).unwrap();
        assert_eq!(policy, RowPolicy::AnyNull);
    }
}
