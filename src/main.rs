// Tabular Prep - Main executable
// Author: Gabriel Demetrios Lafis

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use log::info;

use tabular_prep::{
    api::Server,
    data::{CsvSource, DataSource},
    processing::{basic_info, column_summary, describe, ColumnStats},
    session::Session,
    utils::{init_logging, Config},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = Command::new("Tabular Prep")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Prepare a tabular dataset: impute, prune, encode and vectorize")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(
            Command::new("server")
                .about("Run the API server")
                .arg(
                    Arg::new("host")
                        .short('H')
                        .long("host")
                        .value_name("HOST")
                        .help("Sets the server host")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the server port")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print an overview of a CSV file")
                .arg(
                    Arg::new("file")
                        .value_name("CSV")
                        .help("The CSV file to inspect")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .get_matches();

    // Load configuration
    let config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config file {}", path))?,
        None => Config::default(),
    };

    // Initialize logging
    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    // Handle subcommands
    match matches.subcommand() {
        Some(("server", args)) => run_server(config, args).await,
        Some(("inspect", args)) => inspect(&config, args),
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
            Ok(())
        }
    }
}

async fn run_server(mut config: Config, args: &ArgMatches) -> anyhow::Result<()> {
    // Override config with command line arguments
    if let Some(host) = args.value_of("host") {
        config.server.host = host.to_string();
    }
    if let Some(port) = args.value_of("port") {
        config.server.port = port
            .parse()
            .with_context(|| format!("invalid port: {}", port))?;
    }

    let session = Session::from_config(&config.pipeline).context("failed to create session")?;

    info!("Starting server at {}:{}", config.server.host, config.server.port);
    Server::new(session, config.server).run().await?;

    Ok(())
}

fn inspect(config: &Config, args: &ArgMatches) -> anyhow::Result<()> {
    let path = args.value_of("file").context("missing CSV path")?;
    let dataset = CsvSource::new(path, config.delimiter())
        .read()
        .with_context(|| format!("failed to read {}", path))?;

    let info = basic_info(&dataset);
    println!("Rows: {}  Columns: {}  Missing values: {}", info.rows, info.columns, info.missing);
    println!();

    println!("{:<24} {:<10} {:>8}", "column", "dtype", "missing");
    for column in column_summary(&dataset) {
        println!("{:<24} {:<10} {:>8}", column.column, column.dtype, column.missing);
    }
    println!();

    for (column, stats) in describe(&dataset) {
        match stats {
            ColumnStats::Numeric { count, mean, std: std_dev, min, q50, max, .. } => println!(
                "{}: count={} mean={} std={} min={} median={} max={}",
                column,
                count,
                fmt_stat(mean),
                fmt_stat(std_dev),
                fmt_stat(min),
                fmt_stat(q50),
                fmt_stat(max)
            ),
            ColumnStats::Categorical { count, unique, top, freq } => println!(
                "{}: count={} unique={} top={} freq={}",
                column,
                count,
                unique,
                top.unwrap_or_default(),
                freq.unwrap_or_default()
            ),
        }
    }

    Ok(())
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}
