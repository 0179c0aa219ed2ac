// Missing-value imputation
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{column_index, compute_mean, compute_median, compute_mode, mode_by, replace_column};
use super::{DataProcessor, PipelineError};
use crate::data::{ColumnType, DataSet, Value};

/// Statistic used to fill missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMethod {
    Mean,
    Median,
    Mode,
}

impl FillMethod {
    /// Methods permitted for a column of the given type
    pub fn allowed_for(column_type: ColumnType) -> &'static [FillMethod] {
        match column_type {
            ColumnType::Numeric => &[FillMethod::Mean, FillMethod::Median, FillMethod::Mode],
            ColumnType::Text | ColumnType::Boolean => &[FillMethod::Mode],
        }
    }
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FillMethod::Mean => "mean",
            FillMethod::Median => "median",
            FillMethod::Mode => "mode",
        };
        f.write_str(name)
    }
}

impl FromStr for FillMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(FillMethod::Mean),
            "median" => Ok(FillMethod::Median),
            "mode" => Ok(FillMethod::Mode),
            _ => Err(format!("Unknown fill method: {}", s)),
        }
    }
}

/// Replace every missing value of one column with a single statistic.
///
/// Numeric columns accept mean, median or mode; text and boolean columns
/// accept mode only. The statistic is computed from present values, and
/// mode ties go to the value that sorts first.
pub struct FillMissing {
    column: String,
    method: FillMethod,
}

impl FillMissing {
    /// Create a new fill processor
    pub fn new(column: &str, method: FillMethod) -> Self {
        FillMissing {
            column: column.to_string(),
            method,
        }
    }

    /// Compute the fill value for the column at `index`
    fn fill_value(&self, input: &DataSet, index: usize) -> Result<Value, PipelineError> {
        let column_type = ColumnType::from(input.dtype(index));

        if !FillMethod::allowed_for(column_type).contains(&self.method) {
            return Err(PipelineError::InvalidMethod {
                column: self.column.clone(),
                method: self.method.to_string(),
                column_type: column_type.to_string(),
            });
        }

        let present: Vec<&Value> = input
            .column_values(index)
            .filter(|v| !v.is_missing())
            .collect();

        if present.is_empty() {
            return Err(PipelineError::EmptyColumn(self.column.clone()));
        }

        let value = match column_type {
            ColumnType::Numeric => {
                let integers: Option<Vec<i64>> = present
                    .iter()
                    .map(|v| match v {
                        Value::Integer(i) => Some(*i),
                        _ => None,
                    })
                    .collect();

                let statistic = match integers {
                    Some(integers) => integer_statistic(self.method, integers),
                    None => {
                        let numbers: Vec<f64> = present.iter().filter_map(|v| v.as_f64()).collect();
                        match self.method {
                            FillMethod::Mean => compute_mean(&numbers),
                            FillMethod::Median => compute_median(&numbers),
                            FillMethod::Mode => compute_mode(&numbers),
                        }
                        .map(Value::Float)
                    }
                };

                statistic.ok_or_else(|| PipelineError::EmptyColumn(self.column.clone()))?
            }
            ColumnType::Text | ColumnType::Boolean => {
                let values: Vec<Value> = present.into_iter().cloned().collect();
                mode_by(values, |a, b| a.to_string().cmp(&b.to_string()))
                    .ok_or_else(|| PipelineError::EmptyColumn(self.column.clone()))?
            }
        };

        debug!("Fill value for '{}' ({}): {:?}", self.column, self.method, value);

        Ok(value)
    }
}

/// Statistic over an all-integer column, computed without passing through
/// `f64`. The result is an integer whenever it is integral.
fn integer_statistic(method: FillMethod, mut values: Vec<i64>) -> Option<Value> {
    if values.is_empty() {
        return None;
    }

    let ratio = |sum: i128, n: i128| {
        if sum % n == 0 {
            Value::Integer((sum / n) as i64)
        } else {
            Value::Float(sum as f64 / n as f64)
        }
    };

    match method {
        FillMethod::Mean => {
            let sum: i128 = values.iter().map(|&v| i128::from(v)).sum();
            Some(ratio(sum, values.len() as i128))
        }
        FillMethod::Median => {
            values.sort_unstable();
            let mid = values.len() / 2;
            if values.len() % 2 == 1 {
                Some(Value::Integer(values[mid]))
            } else {
                Some(ratio(i128::from(values[mid - 1]) + i128::from(values[mid]), 2))
            }
        }
        FillMethod::Mode => mode_by(values, i64::cmp).map(Value::Integer),
    }
}

impl DataProcessor for FillMissing {
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError> {
        let index = column_index(input, &self.column)?;
        let fill = self.fill_value(input, index)?;

        let values = input
            .column_values(index)
            .map(|v| if v.is_missing() { fill.clone() } else { v.clone() })
            .collect();

        replace_column(input, index, values)
    }

    fn name(&self) -> &str {
        "fill_missing"
    }

    fn target_columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("method".to_string(), self.method.to_string())])
    }

    fn describe(&self) -> String {
        format!("Filled missing values in '{}' using {}", self.column, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Row, Schema};

    fn people() -> DataSet {
        DataSet::from_rows(
            Schema::from_names(["age", "city", "member"]),
            vec![
                Row::new(vec![
                    Value::Integer(20),
                    Value::String("NY".to_string()),
                    Value::Boolean(true),
                ]),
                Row::new(vec![Value::Null, Value::Null, Value::Null]),
                Row::new(vec![
                    Value::Integer(40),
                    Value::String("LA".to_string()),
                    Value::Boolean(false),
                ]),
                Row::new(vec![
                    Value::Integer(40),
                    Value::String("NY".to_string()),
                    Value::Boolean(false),
                ]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fill_mean() {
        let input = DataSet::from_rows(
            Schema::from_names(["age"]),
            vec![
                Row::new(vec![Value::Integer(20)]),
                Row::new(vec![Value::Null]),
                Row::new(vec![Value::Integer(40)]),
            ],
        )
        .unwrap();

        let result = FillMissing::new("age", FillMethod::Mean).process(&input).unwrap();
        let ages: Vec<f64> = result.column_values(0).filter_map(Value::as_f64).collect();
        assert_eq!(ages, vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_fill_median_and_mode() {
        let median = FillMissing::new("age", FillMethod::Median)
            .process(&people())
            .unwrap();
        assert_eq!(median.data[1].values[0], Value::Integer(40));

        let mode = FillMissing::new("city", FillMethod::Mode)
            .process(&people())
            .unwrap();
        assert_eq!(mode.data[1].values[1], Value::String("NY".to_string()));
    }

    #[test]
    fn test_fill_fractional_mean_becomes_float() {
        let input = DataSet::from_rows(
            Schema::from_names(["n"]),
            vec![
                Row::new(vec![Value::Integer(1)]),
                Row::new(vec![Value::Integer(2)]),
                Row::new(vec![Value::Null]),
            ],
        )
        .unwrap();

        let result = FillMissing::new("n", FillMethod::Mean).process(&input).unwrap();
        assert_eq!(result.data[2].values[0], Value::Float(1.5));
    }

    #[test]
    fn test_fill_leaves_other_columns() {
        let input = people();
        let result = FillMissing::new("age", FillMethod::Mean).process(&input).unwrap();

        assert_eq!(result.missing_count(0), 0);
        for (before, after) in input.data.iter().zip(&result.data) {
            assert_eq!(before.values[1..], after.values[1..]);
        }
    }

    #[test]
    fn test_text_column_rejects_mean() {
        let err = FillMissing::new("city", FillMethod::Mean)
            .process(&people())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidMethod { .. }));

        let err = FillMissing::new("member", FillMethod::Median)
            .process(&people())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidMethod { .. }));
    }

    #[test]
    fn test_boolean_mode() {
        let result = FillMissing::new("member", FillMethod::Mode)
            .process(&people())
            .unwrap();
        assert_eq!(result.data[1].values[2], Value::Boolean(false));
    }

    #[test]
    fn test_all_missing_column_is_empty() {
        let input = DataSet::from_rows(
            Schema::from_names(["x"]),
            vec![Row::new(vec![Value::Null]), Row::new(vec![Value::Null])],
        )
        .unwrap();

        let err = FillMissing::new("x", FillMethod::Mean).process(&input).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyColumn(name) if name == "x"));
    }

    #[test]
    fn test_unknown_column() {
        let err = FillMissing::new("salary", FillMethod::Mean)
            .process(&people())
            .unwrap_err();
        assert!(matches!(err, PipelineError::ColumnNotFound(_)));
    }

    #[test]
    fn test_second_fill_is_a_no_op() {
        let once = FillMissing::new("age", FillMethod::Mean).process(&people()).unwrap();
        let twice = FillMissing::new("age", FillMethod::Mean).process(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_large_integers_fill_exactly() {
        let big = 9_007_199_254_740_993; // 2^53 + 1
        let input = DataSet::from_rows(
            Schema::from_names(["id"]),
            vec![
                Row::new(vec![Value::Integer(big)]),
                Row::new(vec![Value::Integer(big)]),
                Row::new(vec![Value::Null]),
                Row::new(vec![Value::Integer(3)]),
            ],
        )
        .unwrap();

        let mode = FillMissing::new("id", FillMethod::Mode).process(&input).unwrap();
        assert_eq!(mode.data[2].values[0], Value::Integer(big));

        let median = FillMissing::new("id", FillMethod::Median).process(&input).unwrap();
        assert_eq!(median.data[2].values[0], Value::Integer(big));

        let mean = FillMissing::new("id", FillMethod::Mean).process(&input).unwrap();
        assert_eq!(mean.data[2].values[0], Value::Integer(6_004_799_503_160_663));
    }

    #[test]
    fn test_even_integer_median_between_values() {
        let input = DataSet::from_rows(
            Schema::from_names(["n"]),
            vec![
                Row::new(vec![Value::Integer(1)]),
                Row::new(vec![Value::Integer(2)]),
                Row::new(vec![Value::Null]),
            ],
        )
        .unwrap();

        let median = FillMissing::new("n", FillMethod::Median).process(&input).unwrap();
        assert_eq!(median.data[2].values[0], Value::Float(1.5));
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("Median".parse::<FillMethod>(), Ok(FillMethod::Median));
        assert!("average".parse::<FillMethod>().is_err());
    }
}
