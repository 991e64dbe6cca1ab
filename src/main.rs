//! Main entry point for the todotron server.
//!
//! Loads configuration, initializes logging, and starts the HTTP server.

use std::sync::Arc;

use todotron::config::{load_config, print_schema};
use todotron::startup;
use todotron::utils::logger::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::args().any(|arg| arg == "--schema") {
        print_schema();
        return Ok(());
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    startup::run(config).await
}
