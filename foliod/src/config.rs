//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use std::env;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Scoring model configuration
    pub scoring: ScoringConfig,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// Scoring model configuration.
///
/// Anchors feed the ratio-decay score model: a company whose ratio equals
/// the anchor earns exactly half marks on that subscore.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// P/E ratio anchor
    pub pe_anchor: f64,
    /// P/B ratio anchor
    pub pb_anchor: f64,
    /// Debt-to-equity anchor
    pub debt_anchor: f64,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let api = Self::load_api_config()?;
        let scoring = Self::load_scoring_config()?;

        Ok(Self {
            api,
            scoring,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            scoring: ScoringConfig {
                pe_anchor: 15.0,
                pb_anchor: 1.5,
                debt_anchor: 1.0,
            },
            environment: Environment::Test,
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("FOLIO_ENV").unwrap_or_else(|_| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid FOLIO_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_api_config() -> DaemonResult<ApiConfig> {
        let host = env::var("FOLIO_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_str = env::var("FOLIO_API_PORT").unwrap_or_else(|_| "8080".to_string());

        let port = port_str
            .parse::<u16>()
            .map_err(|_| DaemonError::Config(format!("Invalid FOLIO_API_PORT: {}", port_str)))?;

        Ok(ApiConfig { host, port })
    }

    fn load_scoring_config() -> DaemonResult<ScoringConfig> {
        let pe_anchor = Self::load_f64_env("FOLIO_PE_ANCHOR", 15.0)?;
        let pb_anchor = Self::load_f64_env("FOLIO_PB_ANCHOR", 1.5)?;
        let debt_anchor = Self::load_f64_env("FOLIO_DEBT_ANCHOR", 1.0)?;

        Ok(ScoringConfig {
            pe_anchor,
            pb_anchor,
            debt_anchor,
        })
    }

    fn load_f64_env(key: &str, default: f64) -> DaemonResult<f64> {
        match env::var(key) {
            Ok(val) => val
                .parse::<f64>()
                .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val))),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            scoring: ScoringConfig {
                pe_anchor: 15.0,
                pb_anchor: 1.5,
                debt_anchor: 1.0,
            },
            environment: Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
