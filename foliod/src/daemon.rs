//! Daemon: runtime orchestrator.
//!
//! Ties together the repositories, the application services, and the HTTP
//! API server.
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Build repositories and services
//! 3. Start API server
//! 4. Block until SIGINT, then shut down

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use folio_app::{CompanyService, PortfolioService};
use folio_domain::{EqualWeightPlanner, RatioDecayModel};
use folio_store::{MemoryCompanyRepository, MemoryPortfolioRepository};

use crate::api::{create_router, ApiState};
use crate::config::Config;
use crate::error::{DaemonError, DaemonResult};

// =============================================================================
// Daemon
// =============================================================================

/// The main folio daemon.
pub struct Daemon {
    /// Configuration
    config: Config,
    /// Shared API state (services over the repositories)
    state: Arc<ApiState>,
}

impl Daemon {
    /// Create a daemon backed by in-memory repositories.
    ///
    /// All state lives in the process and is lost on restart.
    pub fn new_in_memory(config: Config) -> Self {
        let company_repo = Arc::new(MemoryCompanyRepository::new());
        let portfolio_repo = Arc::new(MemoryPortfolioRepository::new(company_repo.clone()));

        let score_model = Arc::new(RatioDecayModel::new(
            config.scoring.pe_anchor,
            config.scoring.pb_anchor,
            config.scoring.debt_anchor,
        ));

        let state = Arc::new(ApiState {
            companies: CompanyService::new(company_repo.clone(), score_model),
            portfolios: PortfolioService::new(
                portfolio_repo,
                company_repo,
                Arc::new(EqualWeightPlanner),
            ),
        });

        Self { config, state }
    }

    /// Run the daemon.
    ///
    /// Blocks until shutdown is requested (SIGINT).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            "Starting folio daemon"
        );

        let api_addr = self.start_api_server().await?;
        info!(%api_addr, "API server started");

        tokio::signal::ctrl_c().await.map_err(|e| {
            DaemonError::Config(format!("Failed to install shutdown handler: {}", e))
        })?;
        info!("Received shutdown signal");

        info!("Daemon stopped");
        Ok(())
    }

    /// Start the API server and return its bound address.
    pub async fn start_api_server(&self) -> DaemonResult<SocketAddr> {
        let router = create_router(self.state.clone()).layer(TraceLayer::new_for_http());
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DaemonError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| DaemonError::Config(format!("Failed to get local address: {}", e)))?;

        // Spawn the server task
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!(error = %e, "API server error");
            }
        });

        Ok(local_addr)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_api_server_binds_ephemeral_port() {
        let daemon = Daemon::new_in_memory(Config::test());
        let addr = daemon.start_api_server().await.unwrap();

        assert_ne!(addr.port(), 0);
    }
}
