//! Geodata Inspect Main Entry Point
//!
//! Connects to the search service, makes sure the geodata index exists and
//! prints its mapping.

use dotenv::dotenv;
use geodata_inspect::{ensure_index, render_mapping, InspectError, Settings};
use geodata_repository::IndexClient;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), InspectError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("geodata_inspect=info,geodata_repository=info"));

    let json_output = env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| InspectError::config(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| InspectError::config(e.to_string()))?;
    }

    info!(
        service_name = "geodata-inspect",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json_output,
        "Tracing initialized"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), InspectError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    let settings = Settings::from_env();
    info!(url = %settings.url, dialect = ?settings.dialect, "Starting geodata inspect");

    let client = match IndexClient::connect(settings.client_config()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create index client");
            return Err(e.into());
        }
    };

    match ensure_index(&client).await {
        Ok(mapping) => {
            println!("{}", render_mapping(&mapping)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to inspect index");
            Err(e)
        }
    }
}
