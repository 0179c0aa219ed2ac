// API request handlers
// Author: Gabriel Demetrios Lafis

use std::sync::MutexGuard;

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::{models::*, ApiError, SharedSession};
use crate::processing::{basic_info, column_summary, correlation_matrix, describe, value_counts};
use crate::session::{Operation, Session};

fn lock(session: &SharedSession) -> Result<MutexGuard<'_, Session>, ApiError> {
    session
        .lock()
        .map_err(|_| ApiError::InternalError("Session lock poisoned".to_string()))
}

/// Upload or reload the dataset from a CSV body
pub async fn upload_dataset(
    session: SharedSession,
    body: web::Bytes,
) -> Result<impl Responder, ApiError> {
    if body.is_empty() {
        return Err(ApiError::ValidationError("Request body is empty".to_string()));
    }

    let outcome = lock(&session)?.load_csv(&body[..])?;

    Ok(HttpResponse::Created().json(OperationResponse {
        operation: "load".to_string(),
        outcome,
    }))
}

/// Preview the first rows of the dataset
pub async fn preview_dataset(
    session: SharedSession,
    query: web::Query<PreviewQuery>,
) -> Result<impl Responder, ApiError> {
    let session = lock(&session)?;
    let limit = query.limit.unwrap_or(DEFAULT_PREVIEW_ROWS);

    Ok(HttpResponse::Ok().json(DatasetPreview::new(session.dataset()?, limit)))
}

/// Download the dataset as CSV
pub async fn export_dataset(session: SharedSession) -> Result<impl Responder, ApiError> {
    let bytes = lock(&session)?.export_csv()?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"processed_data.csv\"",
        ))
        .body(bytes))
}

/// Row, column and missing-value counts
pub async fn overview(session: SharedSession) -> Result<impl Responder, ApiError> {
    let session = lock(&session)?;
    Ok(HttpResponse::Ok().json(basic_info(session.dataset()?)))
}

/// Per-column dtype and missing counts
pub async fn columns(session: SharedSession) -> Result<impl Responder, ApiError> {
    let session = lock(&session)?;
    Ok(HttpResponse::Ok().json(column_summary(session.dataset()?)))
}

/// Descriptive statistics of every column
pub async fn describe_dataset(session: SharedSession) -> Result<impl Responder, ApiError> {
    let session = lock(&session)?;

    let stats: Vec<ColumnDescription> = describe(session.dataset()?)
        .into_iter()
        .map(|(column, stats)| ColumnDescription { column, stats })
        .collect();

    Ok(HttpResponse::Ok().json(stats))
}

/// Correlation matrix of numeric columns
pub async fn correlation(session: SharedSession) -> Result<impl Responder, ApiError> {
    let session = lock(&session)?;
    Ok(HttpResponse::Ok().json(correlation_matrix(session.dataset()?)))
}

/// Value frequencies of one column
pub async fn column_counts(
    session: SharedSession,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let session = lock(&session)?;
    let column = path.into_inner();

    let counts: Vec<ValueCount> = value_counts(session.dataset()?, &column)?
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "column": column,
        "counts": counts,
    })))
}

/// Apply one operation to the dataset
pub async fn apply_operation(
    session: SharedSession,
    payload: web::Json<Operation>,
) -> Result<impl Responder, ApiError> {
    let operation = payload.into_inner();
    let label = operation.label().to_string();

    let outcome = lock(&session)?.apply(operation)?;

    Ok(HttpResponse::Ok().json(OperationResponse {
        operation: label,
        outcome,
    }))
}

/// Operation history, oldest first
pub async fn history(session: SharedSession) -> Result<impl Responder, ApiError> {
    let session = lock(&session)?;
    Ok(HttpResponse::Ok().json(json!({
        "operations": session.history().records(),
    })))
}

/// Plain-text processing report
pub async fn report(session: SharedSession) -> Result<impl Responder, ApiError> {
    let report = lock(&session)?.report();
    Ok(HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(report))
}
