//! This file defines the feederwatch binary entry point.

use feederwatch::app;
use feederwatch::cli;
use feederwatch::error::log_error_chain;
use feederwatch::metrics;
use feederwatch::server;
use feederwatch::tracing;

use std::process::exit;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing(&args);
    metrics::register_metrics();
    let state = match app::init(&args) {
        Ok(state) => state,
        Err(error) => {
            log_error_chain("Failed to initialise application", &error);
            exit(1)
        }
    };
    if state.blob_store.is_none() {
        ::tracing::info!("Object storage keys not set; object storage disabled");
    }
    let service = app::service(state);
    server::serve(&args, service).await;
    tracing::shutdown_tracing();
}
