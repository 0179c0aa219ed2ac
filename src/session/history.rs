// Operation history log and report rendering
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::processing::DataProcessor;

/// One committed operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRecord {
    pub operator: String,
    pub columns: Vec<String>,
    pub parameters: BTreeMap<String, String>,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl OperationRecord {
    /// Record an operation described by free text
    pub fn new(operator: &str, description: String) -> Self {
        OperationRecord {
            operator: operator.to_string(),
            columns: Vec::new(),
            parameters: BTreeMap::new(),
            description,
            timestamp: Utc::now(),
        }
    }

    /// Record a processor invocation
    pub fn from_processor(processor: &dyn DataProcessor) -> Self {
        OperationRecord {
            operator: processor.name().to_string(),
            columns: processor.target_columns(),
            parameters: processor.parameters(),
            description: processor.describe(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only log of committed operations, oldest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    records: Vec<OperationRecord>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn record(&mut self, record: OperationRecord) {
        self.records.push(record);
    }

    /// All records in commit order
    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the plain-text report: numbered operations, then the final shape
    pub fn render_report(&self, shape: Option<(usize, usize)>) -> String {
        let mut report = String::from("Data Processing Report\n");
        report.push_str("======================\n\n");

        report.push_str("Operations performed:\n");
        if self.records.is_empty() {
            report.push_str("  (none)\n");
        }
        for (i, record) in self.records.iter().enumerate() {
            let _ = writeln!(report, "  {}. {}", i + 1, record.description);
        }

        report.push('\n');
        match shape {
            Some((rows, columns)) => {
                let _ = writeln!(report, "Final shape: {} rows x {} columns", rows, columns);
            }
            None => report.push_str("Final shape: no dataset loaded\n"),
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_ordered() {
        let mut history = History::new();
        history.record(OperationRecord::new("load", "Loaded data".to_string()));
        history.record(OperationRecord::new("fill_missing", "Filled age".to_string()));

        let operators: Vec<&str> = history.records().iter().map(|r| r.operator.as_str()).collect();
        assert_eq!(operators, vec!["load", "fill_missing"]);
        assert!(history.records()[0].timestamp <= history.records()[1].timestamp);
    }

    #[test]
    fn test_render_report() {
        let mut history = History::new();
        history.record(OperationRecord::new("load", "Loaded 3 rows".to_string()));
        history.record(OperationRecord::new("drop_rows", "Dropped rows".to_string()));

        let report = history.render_report(Some((2, 4)));
        assert!(report.contains("  1. Loaded 3 rows\n  2. Dropped rows\n"));
        assert!(report.ends_with("Final shape: 2 rows x 4 columns\n"));
    }

    #[test]
    fn test_empty_report() {
        let report = History::new().render_report(None);
        assert!(report.contains("(none)"));
        assert!(report.contains("no dataset loaded"));
    }
}
