// API server example
// Author: Gabriel Demetrios Lafis

use tabular_prep::{
    api::Server,
    session::Session,
    utils::{init_logging, ServerConfig},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    if let Err(err) = init_logging(log::LevelFilter::Info) {
        eprintln!("Error initializing logger: {}", err);
    }

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        workers: Some(2),
        enable_cors: true,
    };

    println!("Starting API server at http://{}:{}", config.host, config.port);
    println!("Upload a CSV with: curl --data-binary @data.csv http://{}:{}/api/v1/dataset", config.host, config.port);
    println!("Press Ctrl+C to stop");

    Server::new(Session::default(), config).run().await
}
