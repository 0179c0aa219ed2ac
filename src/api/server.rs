// API server implementation
// Author: Gabriel Demetrios Lafis

use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use super::routes;
use crate::session::Session;
use crate::utils::ServerConfig;

/// Largest accepted CSV upload
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Session shared by every worker; the mutex admits one action at a time
pub type SharedSession = web::Data<Mutex<Session>>;

/// Wrap a session for use as actix application data
pub fn shared_session(session: Session) -> SharedSession {
    web::Data::new(Mutex::new(session))
}

/// API server
pub struct Server {
    config: ServerConfig,
    session: SharedSession,
}

impl Server {
    /// Create a new API server around a session
    pub fn new(session: Session, config: ServerConfig) -> Self {
        Server {
            config,
            session: shared_session(session),
        }
    }

    /// Run the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let session = self.session.clone();
        let enable_cors = self.config.enable_cors;
        let workers = self.config.workers();

        info!(
            "Starting server at http://{}:{} with {} workers",
            self.config.host, self.config.port, workers
        );

        HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600)
            } else {
                Cors::default()
            };

            App::new()
                .wrap(cors)
                .app_data(session.clone())
                .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
                .configure(routes::configure)
        })
        .workers(workers)
        .bind((self.config.host.as_str(), self.config.port))?
        .run()
        .await
    }
}
