// Data module for the in-memory table and its CSV boundary
// Author: Gabriel Demetrios Lafis

mod csv;
mod schema;

pub use self::csv::*;
pub use schema::*;

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a generic data source
pub trait DataSource {
    /// Read data from the source
    fn read(&self) -> Result<DataSet, DataError>;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Represents a generic data sink
pub trait DataSink {
    /// Write data to the sink
    fn write(&self, data: &DataSet) -> Result<(), DataError>;

    /// Get the sink name
    fn name(&self) -> &str;
}

/// Represents a dataset with schema and data.
///
/// Rows are stored row-major; every row carries exactly one value per schema
/// field, so all columns always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    pub schema: Schema,
    pub data: Vec<Row>,
    pub metadata: Metadata,
}

impl DataSet {
    /// Create a new empty dataset
    pub fn new(schema: Schema) -> Self {
        DataSet {
            schema,
            data: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Create a dataset from a schema and rows, checking names and row widths
    pub fn from_rows(schema: Schema, rows: Vec<Row>) -> Result<Self, DataError> {
        schema.validate()?;

        let mut dataset = DataSet::new(schema);
        for row in rows {
            dataset.add_row(row)?;
        }

        Ok(dataset)
    }

    /// Add a row to the dataset
    pub fn add_row(&mut self, row: Row) -> Result<(), DataError> {
        if row.values.len() != self.schema.fields.len() {
            return Err(DataError::SchemaMismatch {
                expected: self.schema.fields.len(),
                got: row.values.len(),
            });
        }

        self.data.push(row);
        Ok(())
    }

    /// Get the number of rows in the dataset
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of columns in the dataset
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Get the (rows, columns) shape of the dataset
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.column_count())
    }

    /// Get the column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.names()
    }

    /// Get a reference to a row by index
    pub fn get_row(&self, index: usize) -> Option<&Row> {
        self.data.get(index)
    }

    /// Iterate over the values of the column at `index`
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.data.iter().filter_map(move |row| row.get(index))
    }

    /// Count missing values in the column at `index`
    pub fn missing_count(&self, index: usize) -> usize {
        self.column_values(index).filter(|v| v.is_missing()).count()
    }

    /// Count missing values across the whole dataset
    pub fn total_missing(&self) -> usize {
        (0..self.column_count()).map(|i| self.missing_count(i)).sum()
    }

    /// Infer the storage type of the column at `index` from its current content
    pub fn dtype(&self, index: usize) -> DataType {
        DataType::infer(self.column_values(index))
    }

    /// Compute the column type tag for a named column
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.schema
            .index_of(name)
            .map(|index| ColumnType::from(self.dtype(index)))
    }
}

/// Represents a row in a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    /// Create a new row with the given values
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    /// Get a reference to a value by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Whether any value in the row is missing
    pub fn any_missing(&self) -> bool {
        self.values.iter().any(Value::is_missing)
    }

    /// Whether every value in the row is missing
    pub fn all_missing(&self) -> bool {
        self.values.iter().all(Value::is_missing)
    }
}

/// Represents a value in a row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Null and NaN both count as missing
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Text form of a present value; `None` when missing
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            // Integral floats keep a decimal so they read back as floats
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                write!(f, "{:.1}", v)
            }
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => f.write_str(s),
        }
    }
}

/// Storage type of a column, inferred from its values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    String,
}

impl DataType {
    /// Infer the storage type of a sequence of values.
    ///
    /// Missing values are ignored. A column with no present values is
    /// `Float`, the type a column of NaNs would have. Mixed content is
    /// `String`.
    pub fn infer<'a, I>(values: I) -> DataType
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut seen: Option<DataType> = None;

        for value in values {
            let current = match value {
                v if v.is_missing() => continue,
                Value::Boolean(_) => DataType::Boolean,
                Value::Integer(_) => DataType::Integer,
                Value::Float(_) => DataType::Float,
                Value::String(_) | Value::Null => return DataType::String,
            };

            seen = Some(match (seen, current) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(DataType::Integer), DataType::Float)
                | (Some(DataType::Float), DataType::Integer) => DataType::Float,
                _ => return DataType::String,
            });
        }

        seen.unwrap_or(DataType::Float)
    }

    /// Short dtype label used in summaries
    pub fn label(&self) -> &'static str {
        match self {
            DataType::Boolean => "bool",
            DataType::Integer => "int64",
            DataType::Float => "float64",
            DataType::String => "object",
        }
    }
}

/// Column type tag that operators dispatch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
    Boolean,
}

impl From<DataType> for ColumnType {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Integer | DataType::Float => ColumnType::Numeric,
            DataType::Boolean => ColumnType::Boolean,
            DataType::String => ColumnType::Text,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
        };
        f.write_str(label)
    }
}

/// Represents metadata for a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub properties: HashMap<String, String>,
}

impl Metadata {
    /// Create new empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property to the metadata
    pub fn add(&mut self, key: String, value: String) {
        self.properties.insert(key, value);
    }

    /// Get a property from the metadata
    pub fn get(&self, key: &str) -> Option<&String> {
        self.properties.get(key)
    }
}

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Schema mismatch: expected {expected} values per row, got {got}")]
    SchemaMismatch { expected: usize, got: usize },
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("Delimiter '{0}' is not a single-byte ASCII character")]
    InvalidDelimiter(char),
}

impl From<::csv::Error> for DataError {
    fn from(err: ::csv::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Field {
        Field::new(name.to_string())
    }

    #[test]
    fn test_add_row_rejects_wrong_width() {
        let mut dataset = DataSet::new(Schema::new(vec![field("a"), field("b")]));

        let err = dataset.add_row(Row::new(vec![Value::Integer(1)])).unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { expected: 2, got: 1 }));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_from_rows_rejects_duplicate_names() {
        let schema = Schema::new(vec![field("a"), field("a")]);
        let err = DataSet::from_rows(schema, vec![]).unwrap_err();
        assert!(matches!(err, DataError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_dtype_inference() {
        let ints = [Value::Integer(1), Value::Null, Value::Integer(3)];
        assert_eq!(DataType::infer(&ints), DataType::Integer);

        let mixed_numbers = [Value::Integer(1), Value::Float(2.5)];
        assert_eq!(DataType::infer(&mixed_numbers), DataType::Float);

        let mixed = [Value::Integer(1), Value::String("x".to_string())];
        assert_eq!(DataType::infer(&mixed), DataType::String);

        let bools = [Value::Boolean(true), Value::Null];
        assert_eq!(DataType::infer(&bools), DataType::Boolean);

        let empty = [Value::Null, Value::Float(f64::NAN)];
        assert_eq!(DataType::infer(&empty), DataType::Float);
    }

    #[test]
    fn test_column_type_follows_content() {
        let schema = Schema::new(vec![field("city"), field("age")]);
        let dataset = DataSet::from_rows(
            schema,
            vec![
                Row::new(vec![Value::String("NY".to_string()), Value::Integer(20)]),
                Row::new(vec![Value::String("LA".to_string()), Value::Null]),
            ],
        )
        .unwrap();

        assert_eq!(dataset.column_type("city"), Some(ColumnType::Text));
        assert_eq!(dataset.column_type("age"), Some(ColumnType::Numeric));
        assert_eq!(dataset.column_type("missing"), None);
        assert_eq!(dataset.missing_count(1), 1);
        assert_eq!(dataset.total_missing(), 1);
    }

    #[test]
    fn test_integral_floats_display_with_decimal() {
        assert_eq!(Value::Float(30.0).to_string(), "30.0");
        assert_eq!(Value::Float(1e16).to_string(), "10000000000000000.0");
        assert_eq!(Value::Float(-2e20).to_string(), "-200000000000000000000.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_nan_counts_as_missing() {
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(Value::Null.is_missing());
        assert!(!Value::String(String::new()).is_missing());
        assert_eq!(Value::Float(f64::NAN).as_text(), None);
        assert_eq!(Value::Integer(7).as_text(), Some("7".to_string()));
    }
}
