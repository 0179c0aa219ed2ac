// Error handling utilities
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

/// Error raised while loading application settings
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
