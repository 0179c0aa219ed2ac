// Session orchestration
// Author: Gabriel Demetrios Lafis

mod history;
mod operation;

pub use history::*;
pub use operation::*;

use std::io::Read;
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::data::{read_csv, to_csv_bytes, DataError, DataSet};
use crate::processing::{PipelineError, StopWords, DEFAULT_MAX_FEATURES};
use crate::storage::{StorageError, TableStore};
use crate::utils::PipelineConfig;

/// Represents an error raised while handling a session action
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No dataset has been loaded")]
    NoDataset,
    #[error("Operation '{0}' removes data and must be confirmed")]
    ConfirmationRequired(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Data(#[from] DataError),
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Empty => SessionError::NoDataset,
        }
    }
}

/// Result of a committed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub rows: usize,
    pub columns: usize,
    pub rows_removed: usize,
}

/// Owns the table store and the operation history of one session.
///
/// Every action runs to completion before the next one starts. A failed
/// operation leaves both the table and the history untouched.
pub struct Session {
    store: TableStore,
    history: History,
    stop_words: Arc<StopWords>,
    max_features: usize,
    delimiter: u8,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(StopWords::english()))
    }
}

impl Session {
    /// Create a new session sharing the given stop words
    pub fn new(stop_words: Arc<StopWords>) -> Self {
        Session {
            store: TableStore::new(),
            history: History::new(),
            stop_words,
            max_features: DEFAULT_MAX_FEATURES,
            delimiter: b',',
        }
    }

    /// Create a session from pipeline settings, loading a custom stop-word
    /// list when one is configured
    pub fn from_config(config: &PipelineConfig) -> Result<Self, DataError> {
        if !config.csv_delimiter.is_ascii() {
            return Err(DataError::InvalidDelimiter(config.csv_delimiter));
        }

        let stop_words = match &config.stop_words {
            Some(path) => StopWords::from_file(path)?,
            None => StopWords::english(),
        };

        Ok(Session::new(Arc::new(stop_words))
            .with_max_features(config.max_features)
            .with_delimiter(config.csv_delimiter as u8))
    }

    /// Set the vocabulary bound used when an operation gives none
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the CSV delimiter used for loading and export
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace the table with the contents of a CSV stream
    pub fn load_csv<R: Read>(&mut self, reader: R) -> Result<Outcome, SessionError> {
        let data = read_csv(reader, self.delimiter)?;
        Ok(self.load(data))
    }

    /// Replace the table wholesale
    pub fn load(&mut self, data: DataSet) -> Outcome {
        let (rows, columns) = data.shape();
        info!("Loaded dataset with {} rows and {} columns", rows, columns);

        self.history.record(OperationRecord::new(
            "load",
            format!("Loaded dataset with {} rows and {} columns", rows, columns),
        ));
        self.store.set(data);

        Outcome {
            rows,
            columns,
            rows_removed: 0,
        }
    }

    /// Current table
    pub fn dataset(&self) -> Result<&DataSet, SessionError> {
        Ok(self.store.get()?)
    }

    /// Committed operations, oldest first
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run one operation and commit its result
    pub fn apply(&mut self, operation: Operation) -> Result<Outcome, SessionError> {
        if operation.is_destructive() && !operation.is_confirmed() {
            warn!("Operation '{}' rejected: not confirmed", operation.label());
            return Err(SessionError::ConfirmationRequired(operation.label().to_string()));
        }

        let input = self.store.get()?;
        let processor = operation.processor(&self.stop_words, self.max_features);

        let result = match processor.process(input) {
            Ok(result) => result,
            Err(err) => {
                warn!("Operation '{}' rejected: {}", processor.name(), err);
                return Err(err.into());
            }
        };

        let rows_removed = input.len().saturating_sub(result.len());
        let (rows, columns) = result.shape();
        let record = OperationRecord::from_processor(processor.as_ref());

        info!("{} -> {} rows x {} columns", record.description, rows, columns);
        self.store.set(result);
        self.history.record(record);

        Ok(Outcome {
            rows,
            columns,
            rows_removed,
        })
    }

    /// Current table as CSV bytes
    pub fn export_csv(&self) -> Result<Vec<u8>, SessionError> {
        Ok(to_csv_bytes(self.store.get()?, self.delimiter)?)
    }

    /// Plain-text report of the session
    pub fn report(&self) -> String {
        let shape = self.store.get().ok().map(DataSet::shape);
        self.history.render_report(shape)
    }
}
