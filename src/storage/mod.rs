// Storage module holding the session's current table
// Author: Gabriel Demetrios Lafis

mod table;

pub use table::*;

use thiserror::Error;

/// Represents an error in the storage module
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No dataset has been loaded")]
    Empty,
}
