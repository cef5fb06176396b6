//! DiagramHub Server: serves diagram files and folders over HTTP.
//!
//! Main entry point that loads configuration, initializes logging, and
//! starts the API server.

use tracing_subscriber::{EnvFilter, fmt};

use diagramhub_core::AppError;
use diagramhub_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        extension = %config.workspace.file_extension,
        "Starting DiagramHub"
    );

    if let Err(e) = diagramhub_api::app::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration for the environment named by `DIAGRAMHUB_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DIAGRAMHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
