// API module exposing the session over HTTP
// Author: Gabriel Demetrios Lafis

mod server;
mod routes;
mod handlers;
mod models;

pub use server::*;
pub use routes::*;
pub use handlers::*;
pub use models::*;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::data::DataError;
use crate::processing::PipelineError;
use crate::session::SessionError;

/// Represents an error in the API module
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Session(SessionError::NoDataset) => "no_dataset",
            ApiError::Session(SessionError::ConfirmationRequired(_)) => "confirmation_required",
            ApiError::Session(SessionError::Data(_)) => "invalid_data",
            ApiError::Session(SessionError::Pipeline(err)) | ApiError::Pipeline(err) => {
                pipeline_kind(err)
            }
            ApiError::ValidationError(_) => "validation",
            ApiError::InternalError(_) => "internal",
        }
    }
}

fn pipeline_kind(err: &PipelineError) -> &'static str {
    match err {
        PipelineError::InvalidMethod { .. } => "invalid_method",
        PipelineError::EmptyColumn(_) => "empty_column",
        PipelineError::InvalidSelection(_) => "invalid_selection",
        PipelineError::UnsupportedColumnType { .. } => "unsupported_column_type",
        PipelineError::RowMismatch { .. } => "row_mismatch",
        PipelineError::ColumnNotFound(_) => "column_not_found",
        PipelineError::DuplicateColumn(_) => "duplicate_column",
        PipelineError::InvalidArgument(_) => "invalid_argument",
        PipelineError::Data(_) => "invalid_data",
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::NoDataset) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::ConfirmationRequired(_)) => {
                StatusCode::PRECONDITION_REQUIRED
            }
            ApiError::Session(SessionError::Data(DataError::IoError(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Session(SessionError::Data(_)) | ApiError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Session(SessionError::Pipeline(PipelineError::ColumnNotFound(_)))
            | ApiError::Pipeline(PipelineError::ColumnNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::Pipeline(_)) | ApiError::Pipeline(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = ApiError::from(SessionError::NoDataset);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = ApiError::from(SessionError::ConfirmationRequired("drop_rows".to_string()));
        assert_eq!(err.status_code(), StatusCode::PRECONDITION_REQUIRED);
        assert_eq!(err.kind(), "confirmation_required");

        let err = ApiError::from(SessionError::Pipeline(PipelineError::EmptyColumn("a".to_string())));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind(), "empty_column");

        let err = ApiError::from(PipelineError::ColumnNotFound("a".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
