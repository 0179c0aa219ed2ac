// Read-only dataset summaries
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeMap;

use serde::Serialize;

use super::{column_index, compute_correlation, compute_max, compute_mean, compute_min};
use super::{compute_quantile, compute_std_dev, PipelineError};
use crate::data::{ColumnType, DataSet, Value};

/// Shape and total missing count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicInfo {
    pub rows: usize,
    pub columns: usize,
    pub missing: usize,
}

/// Per-column dtype and missing count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub dtype: String,
    pub column_type: String,
    pub missing: usize,
}

/// Descriptive statistics for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnStats {
    Numeric {
        count: usize,
        mean: Option<f64>,
        std: Option<f64>,
        min: Option<f64>,
        q25: Option<f64>,
        q50: Option<f64>,
        q75: Option<f64>,
        max: Option<f64>,
    },
    Categorical {
        count: usize,
        unique: usize,
        top: Option<String>,
        freq: Option<usize>,
    },
}

/// Pairwise correlation of numeric columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `None` where a pair has too few rows or zero variance
    pub values: Vec<Vec<Option<f64>>>,
}

/// Rows, columns and missing values of the whole dataset
pub fn basic_info(dataset: &DataSet) -> BasicInfo {
    BasicInfo {
        rows: dataset.len(),
        columns: dataset.column_count(),
        missing: dataset.total_missing(),
    }
}

/// One summary entry per column, in column order
pub fn column_summary(dataset: &DataSet) -> Vec<ColumnSummary> {
    dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let dtype = dataset.dtype(i);
            ColumnSummary {
                column: field.name.clone(),
                dtype: dtype.label().to_string(),
                column_type: ColumnType::from(dtype).to_string(),
                missing: dataset.missing_count(i),
            }
        })
        .collect()
}

/// Descriptive statistics for every column
pub fn describe(dataset: &DataSet) -> Vec<(String, ColumnStats)> {
    dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| (field.name.clone(), describe_index(dataset, i)))
        .collect()
}

fn describe_index(dataset: &DataSet, index: usize) -> ColumnStats {
    match ColumnType::from(dataset.dtype(index)) {
        ColumnType::Numeric => {
            let values: Vec<f64> = dataset.column_values(index).filter_map(|v| v.as_f64()).collect();
            ColumnStats::Numeric {
                count: values.len(),
                mean: compute_mean(&values),
                std: compute_std_dev(&values),
                min: compute_min(&values),
                q25: compute_quantile(&values, 0.25),
                q50: compute_quantile(&values, 0.5),
                q75: compute_quantile(&values, 0.75),
                max: compute_max(&values),
            }
        }
        ColumnType::Text | ColumnType::Boolean => {
            let counts = count_values(dataset, index);
            let count = counts.values().sum();

            // First maximum in value order
            let top = counts
                .iter()
                .fold(None, |best: Option<(&String, usize)>, (value, &n)| match best {
                    Some((_, m)) if m >= n => best,
                    _ => Some((value, n)),
                });

            ColumnStats::Categorical {
                count,
                unique: counts.len(),
                top: top.map(|(value, _)| value.clone()),
                freq: top.map(|(_, n)| n),
            }
        }
    }
}

fn count_values(dataset: &DataSet, index: usize) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for text in dataset.column_values(index).filter_map(|v| v.as_text()) {
        *counts.entry(text).or_insert(0) += 1;
    }
    counts
}

/// Frequency of each present value of a column, most frequent first
pub fn value_counts(dataset: &DataSet, column: &str) -> Result<Vec<(String, usize)>, PipelineError> {
    let index = column_index(dataset, column)?;

    let mut counts: Vec<(String, usize)> = count_values(dataset, index).into_iter().collect();
    counts.sort_by(|(a, n), (b, m)| m.cmp(n).then_with(|| a.cmp(b)));

    Ok(counts)
}

/// Pearson correlation between every pair of numeric or boolean columns.
///
/// Booleans count as 0/1. Each pair uses only the rows where both values
/// are present.
pub fn correlation_matrix(dataset: &DataSet) -> CorrelationMatrix {
    let numeric: Vec<usize> = (0..dataset.column_count())
        .filter(|&i| {
            matches!(
                ColumnType::from(dataset.dtype(i)),
                ColumnType::Numeric | ColumnType::Boolean
            )
        })
        .collect();

    let values = numeric
        .iter()
        .map(|&a| {
            numeric
                .iter()
                .map(|&b| {
                    let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
                        .data
                        .iter()
                        .filter_map(|row| {
                            let x = correlation_input(&row.values[a])?;
                            let y = correlation_input(&row.values[b])?;
                            Some((x, y))
                        })
                        .unzip();
                    compute_correlation(&xs, &ys)
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: numeric
            .iter()
            .map(|&i| dataset.schema.fields[i].name.clone())
            .collect(),
        values,
    }
}

fn correlation_input(value: &Value) -> Option<f64> {
    match value {
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => other.as_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Row, Schema};

    fn sample() -> DataSet {
        let s = |v: &str| Value::String(v.to_string());
        DataSet::from_rows(
            Schema::from_names(["x", "y", "city"]),
            vec![
                Row::new(vec![Value::Integer(1), Value::Float(2.0), s("NY")]),
                Row::new(vec![Value::Integer(2), Value::Float(4.0), s("LA")]),
                Row::new(vec![Value::Integer(3), Value::Null, s("NY")]),
                Row::new(vec![Value::Integer(4), Value::Float(8.0), Value::Null]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_basic_info_and_columns() {
        let dataset = sample();
        assert_eq!(
            basic_info(&dataset),
            BasicInfo { rows: 4, columns: 3, missing: 2 }
        );

        let summary = column_summary(&dataset);
        assert_eq!(summary[0].dtype, "int64");
        assert_eq!(summary[1].dtype, "float64");
        assert_eq!(summary[2].dtype, "object");
        assert_eq!(summary[2].column_type, "text");
        assert_eq!(summary[1].missing, 1);
    }

    #[test]
    fn test_describe() {
        let stats = describe(&sample());

        match &stats[0].1 {
            ColumnStats::Numeric { count, mean, q50, .. } => {
                assert_eq!(*count, 4);
                assert_eq!(*mean, Some(2.5));
                assert_eq!(*q50, Some(2.5));
            }
            other => panic!("expected numeric stats, got {:?}", other),
        }

        assert_eq!(
            stats[2].1,
            ColumnStats::Categorical {
                count: 3,
                unique: 2,
                top: Some("NY".to_string()),
                freq: Some(2),
            }
        );
    }

    #[test]
    fn test_value_counts() {
        let counts = value_counts(&sample(), "city").unwrap();
        assert_eq!(counts, vec![("NY".to_string(), 2), ("LA".to_string(), 1)]);
        assert!(value_counts(&sample(), "zzz").is_err());
    }

    #[test]
    fn test_correlation_matrix() {
        let matrix = correlation_matrix(&sample());
        assert_eq!(matrix.columns, vec!["x", "y"]);

        let r = matrix.values[0][1].unwrap();
        assert!(r > 0.9);
        assert_eq!(matrix.values[0][1], matrix.values[1][0]);
    }

    #[test]
    fn test_correlation_includes_boolean_columns() {
        let s = |v: &str| Value::String(v.to_string());
        let dataset = DataSet::from_rows(
            Schema::from_names(["score", "passed", "name"]),
            vec![
                Row::new(vec![Value::Integer(90), Value::Boolean(true), s("a")]),
                Row::new(vec![Value::Integer(40), Value::Boolean(false), s("b")]),
                Row::new(vec![Value::Integer(75), Value::Boolean(true), s("c")]),
                Row::new(vec![Value::Integer(20), Value::Boolean(false), Value::Null]),
            ],
        )
        .unwrap();

        let matrix = correlation_matrix(&dataset);
        assert_eq!(matrix.columns, vec!["score", "passed"]);
        assert_eq!(matrix.values[1][1], Some(1.0));
        assert!(matrix.values[0][1].unwrap() > 0.9);
    }
}
