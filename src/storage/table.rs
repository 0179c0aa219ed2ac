// Single-snapshot table store
// Author: Gabriel Demetrios Lafis

use log::debug;

use super::StorageError;
use crate::data::DataSet;

/// Holds the most recent dataset snapshot.
///
/// Every `set` replaces the snapshot wholesale. No earlier snapshot is kept.
#[derive(Debug, Default)]
pub struct TableStore {
    current: Option<DataSet>,
}

impl TableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the current snapshot
    pub fn get(&self) -> Result<&DataSet, StorageError> {
        self.current.as_ref().ok_or(StorageError::Empty)
    }

    /// Replace the current snapshot
    pub fn set(&mut self, data: DataSet) {
        debug!("Storing table with shape {:?}", data.shape());
        self.current = Some(data);
    }
}
