// CSV data source and sink implementation
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use super::{DataError, DataSet, DataSink, DataSource, DataType, Row, Schema, Value};

/// Cell contents treated as missing on read
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None"];

/// CSV data source
pub struct CsvSource {
    path: String,
    delimiter: u8,
}

impl CsvSource {
    /// Create a new CSV data source
    pub fn new<P: AsRef<Path>>(path: P, delimiter: u8) -> Self {
        CsvSource {
            path: path.as_ref().to_string_lossy().to_string(),
            delimiter,
        }
    }
}

impl DataSource for CsvSource {
    fn read(&self) -> Result<DataSet, DataError> {
        let file = File::open(&self.path)?;
        let mut dataset = read_csv(BufReader::new(file), self.delimiter)?;

        dataset.metadata.add("source".to_string(), "csv".to_string());
        dataset.metadata.add("path".to_string(), self.path.clone());

        Ok(dataset)
    }

    fn name(&self) -> &str {
        &self.path
    }
}

/// Parse a CSV stream with a header row into a dataset.
///
/// Every column's values are typed after the whole column has been read:
/// integer if all present cells parse as `i64`, float if they all parse as
/// `f64`, boolean if they are all `true`/`false`, text otherwise.
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<DataSet, DataError> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = dedupe_headers(csv_reader.headers()?.iter());
    let width = headers.len();

    // Read raw cells column by column
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for result in csv_reader.records() {
        let record = result?;
        if record.len() != width {
            return Err(DataError::SchemaMismatch {
                expected: width,
                got: record.len(),
            });
        }

        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            if MISSING_MARKERS.contains(&cell.trim()) {
                column.push(None);
            } else {
                column.push(Some(cell.to_string()));
            }
        }
    }

    let typed: Vec<Vec<Value>> = columns.into_iter().map(type_column).collect();
    let row_count = typed.first().map_or(0, Vec::len);

    let mut rows = Vec::with_capacity(row_count);
    for i in 0..row_count {
        rows.push(Row::new(typed.iter().map(|column| column[i].clone()).collect()));
    }

    let dataset = DataSet::from_rows(Schema::from_names(headers), rows)?;
    debug!("Parsed CSV with {} rows and {} columns", dataset.len(), width);

    Ok(dataset)
}

/// Make header names unique by suffixing repeats with `.1`, `.2`, ...
fn dedupe_headers<'a, I>(headers: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::new();

    for header in headers {
        let mut name = header.to_string();
        while let Some(count) = counts.get_mut(&name) {
            *count += 1;
            name = format!("{}.{}", header, count);
        }
        counts.insert(name.clone(), 0);
        names.push(name);
    }

    names
}

/// Convert the raw cells of one column into typed values
fn type_column(cells: Vec<Option<String>>) -> Vec<Value> {
    let present = || cells.iter().flatten().map(|s| s.trim());

    let data_type = if present().all(|s| s.parse::<i64>().is_ok()) {
        DataType::Integer
    } else if present().all(|s| s.parse::<f64>().is_ok()) {
        DataType::Float
    } else if present().all(|s| parse_bool(s).is_some()) {
        DataType::Boolean
    } else {
        DataType::String
    };

    cells
        .into_iter()
        .map(|cell| match cell {
            None => Value::Null,
            Some(s) => match data_type {
                DataType::Integer => s.trim().parse().map_or(Value::Null, Value::Integer),
                DataType::Float => s.trim().parse().map_or(Value::Null, Value::Float),
                DataType::Boolean => parse_bool(s.trim()).map_or(Value::Null, Value::Boolean),
                DataType::String => Value::String(s),
            },
        })
        .collect()
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// CSV data sink
pub struct CsvSink {
    path: String,
    delimiter: u8,
}

impl CsvSink {
    /// Create a new CSV data sink
    pub fn new<P: AsRef<Path>>(path: P, delimiter: u8) -> Self {
        CsvSink {
            path: path.as_ref().to_string_lossy().to_string(),
            delimiter,
        }
    }
}

impl DataSink for CsvSink {
    fn write(&self, data: &DataSet) -> Result<(), DataError> {
        let file = File::create(&self.path)?;
        write_csv(data, BufWriter::new(file), self.delimiter)
    }

    fn name(&self) -> &str {
        &self.path
    }
}

/// Serialize a dataset as CSV: header row, no index column, missing as empty
pub fn write_csv<W: Write>(data: &DataSet, writer: W, delimiter: u8) -> Result<(), DataError> {
    let mut csv_writer = ::csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(data.column_names())?;

    for row in &data.data {
        let record: Vec<String> = row
            .values
            .iter()
            .map(|value| value.as_text().unwrap_or_default())
            .collect();

        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Serialize a dataset to UTF-8 CSV bytes
pub fn to_csv_bytes(data: &DataSet, delimiter: u8) -> Result<Vec<u8>, DataError> {
    let mut buffer = Vec::new();
    write_csv(data, &mut buffer, delimiter)?;
    Ok(buffer)
}
