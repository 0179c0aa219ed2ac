// API routes configuration
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse, Responder};

use super::handlers;

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))

            // Dataset upload, preview and download
            .service(
                web::scope("/dataset")
                    .route("", web::post().to(handlers::upload_dataset))
                    .route("", web::get().to(handlers::preview_dataset))
                    .route("/export", web::get().to(handlers::export_dataset))
            )

            // Inspection
            .route("/overview", web::get().to(handlers::overview))
            .route("/columns", web::get().to(handlers::columns))
            .route("/columns/{name}/counts", web::get().to(handlers::column_counts))
            .route("/describe", web::get().to(handlers::describe_dataset))
            .route("/correlation", web::get().to(handlers::correlation))

            // Operations
            .route("/operations", web::post().to(handlers::apply_operation))
            .route("/history", web::get().to(handlers::history))
            .route("/report", web::get().to(handlers::report))
    );
}

/// Health check handler
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
