// Tabular Prep
// Author: Gabriel Demetrios Lafis

//! # Tabular Prep
//!
//! A stateful preparation pipeline for a single tabular dataset.
//!
//! ## Features
//!
//! - CSV loading with per-column type inference, and CSV export
//! - Missing-value imputation (mean, median, mode)
//! - Row and column pruning
//! - Label and one-hot encoding
//! - Text cleaning, length features and TF-IDF term features
//! - Read-only summaries: overview, describe, correlation, value counts
//! - An operation history and a plain-text report
//! - REST API driving one session
//!
//! ## Example
//!
//! ```rust
//! use tabular_prep::processing::FillMethod;
//! use tabular_prep::session::{Operation, Session};
//!
//! let mut session = Session::default();
//! session
//!     .load_csv("name,age\nAlice,30\nBob,\n".as_bytes())
//!     .unwrap();
//!
//! let outcome = session
//!     .apply(Operation::FillMissing {
//!         column: "age".to_string(),
//!         method: FillMethod::Mean,
//!     })
//!     .unwrap();
//! assert_eq!(outcome.rows, 2);
//!
//! println!("{}", session.report());
//! ```

pub mod data;
pub mod processing;
pub mod storage;
pub mod session;
pub mod api;
pub mod utils;

// Re-export main types
pub use data::{ColumnType, DataSet, DataType, Field, Row, Schema, Value};
pub use processing::{DataProcessor, PipelineError};
pub use session::{Operation, Session};
pub use api::Server;
pub use utils::Config;
