//! Folio Daemon
//!
//! HTTP service for tracking investment portfolios and company fundamentals.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration
//! cargo run -p foliod
//!
//! # Start with custom environment
//! FOLIO_ENV=test FOLIO_API_PORT=8081 cargo run -p foliod
//! ```
//!
//! # Environment Variables
//!
//! - `FOLIO_ENV`: Environment (test, development, production)
//! - `FOLIO_API_HOST`: API host (default: 0.0.0.0)
//! - `FOLIO_API_PORT`: API port (default: 8080)
//! - `FOLIO_PE_ANCHOR`: P/E scoring anchor (default: 15.0)
//! - `FOLIO_PB_ANCHOR`: P/B scoring anchor (default: 1.5)
//! - `FOLIO_DEBT_ANCHOR`: Debt-to-equity scoring anchor (default: 1.0)

use foliod::{Config, Daemon};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("foliod=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        "Folio Daemon"
    );

    // Create and run daemon
    let daemon = Daemon::new_in_memory(config);
    daemon.run().await?;

    Ok(())
}
