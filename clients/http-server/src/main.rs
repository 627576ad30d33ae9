use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    middleware::{self, Condition},
    web::Data,
    App, HttpServer,
};
use anyhow::{anyhow, Context};
use clap::Parser;
use safetynet_database::{
    consts::consts::DEFAULT_DATA_FILE,
    database::{
        database::Database, options::DatabaseOptions, request_manager::RequestManagerError,
    },
};

mod error;
mod routes;

/// 🚒 SafetyNet Alerts, emergency information REST server over a JSON data file
#[derive(Parser, Debug)]
struct Cli {
    /// JSON document with persons, firestations and medicalrecords. Note: Does not support shell paths, e.g. ~
    #[clap(short, long, env = "SAFETYNET_DATA", default_value = DEFAULT_DATA_FILE)]
    data: std::path::PathBuf,

    /// Port the http server will run on
    #[clap(short, long, default_value = "8080")]
    port: u16,

    /// Address the http server will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    address: String,

    /// Logs every http request
    #[clap(long)]
    log_http: bool,

    #[clap(long, default_value_t = 2)]
    http_workers: usize,

    /// How long a request waits for the database before answering 503
    #[clap(long, default_value_t = 2000)]
    request_timeout_ms: u64,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let database_options = DatabaseOptions::default()
        .set_data_file(args.data.clone())
        .set_request_timeout(Duration::from_millis(args.request_timeout_ms));

    let database = Database::load(database_options)
        .with_context(|| format!("Unable to load data file {}", args.data.display()))?;

    let (request_manager, database_handle) = database.run();

    // Set up Ctrl-C handler
    let set_handler_request_manager_clone = request_manager.clone();

    ctrlc::set_handler(move || {
        match set_handler_request_manager_clone.send_shutdown_request() {
            Ok(shutdown_response) => log::info!("Shutting down server: {}", shutdown_response),
            Err(err) => log::error!("Unable to shutdown database: {}", err),
        }
    })
    .context("Error setting Ctrl-C handler")?;

    log::info!("starting HTTP server on http://{}:{}", args.address, args.port);

    let server_request_manager = request_manager.clone();

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(server_request_manager.clone()))
            .configure(routes::configure)
            .wrap(Cors::permissive())
            .wrap(Condition::new(args.log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address.as_str(), args.port))?
    .run()
    .await?;

    // Ctrl-C may already have stopped the database
    match request_manager.send_shutdown_request() {
        Ok(shutdown_response) => log::info!("{}", shutdown_response),
        Err(RequestManagerError::DatabaseUnavailable) => {}
        Err(err) => log::warn!("Unable to shutdown database: {}", err),
    }

    database_handle
        .join()
        .map_err(|_| anyhow!("Database thread panicked"))
}
