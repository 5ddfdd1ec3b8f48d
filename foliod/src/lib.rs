//! Folio Daemon Library
//!
//! Runtime orchestrator for the folio portfolio tracker.
//!
//! # Architecture
//!
//! ```text
//! HTTP client → API Server → Services → Repositories (in-memory)
//!                               ↓
//!                         Domain model (Company, Portfolio)
//! ```
//!
//! # Components
//!
//! - **Daemon**: Main runtime orchestrator
//! - **API**: HTTP endpoints for company and portfolio operations
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use foliod::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::new_in_memory(config);
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod daemon;
pub mod error;

// Re-exports for convenience
pub use config::{ApiConfig, Config, Environment, ScoringConfig};
pub use daemon::Daemon;
pub use error::{DaemonError, DaemonResult};
