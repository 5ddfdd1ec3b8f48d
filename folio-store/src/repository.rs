//! Repository trait definitions (Ports)
//!
//! These traits define the storage interface for the aggregates, one
//! repository per aggregate root. Implementations can be in-memory or a
//! database backend; the in-memory ones live in this crate.

use crate::error::StoreError;
use async_trait::async_trait;
use folio_domain::{Company, Portfolio, RiskProfile, Sector};

/// Result of a cross-aggregate sector search
///
/// Holdings whose company lookup failed are reported in `skipped_tickers`
/// instead of being silently dropped, so callers can surface the partial
/// result.
#[derive(Debug, Default)]
pub struct SectorSearch {
    /// Portfolios holding at least one company in the sector, each at most once
    pub portfolios: Vec<Portfolio>,
    /// Tickers that could not be resolved against the company repository
    pub skipped_tickers: Vec<String>,
}

/// Repository for Company aggregates, keyed by ticker
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Find a company by its stock ticker
    async fn find_by_ticker(&self, ticker: &str) -> Result<Company, StoreError>;

    /// Find companies whose current score falls within `[min, max]` inclusive
    ///
    /// Fails with `InvalidRange` when `min > max`.
    async fn search_by_score_range(&self, min: f64, max: f64)
        -> Result<Vec<Company>, StoreError>;

    /// Save a company (insert or update, keyed by ticker)
    async fn save(&self, company: &Company) -> Result<(), StoreError>;

    /// Delete a company by ticker; fails with `NotFound` when absent
    async fn delete(&self, ticker: &str) -> Result<(), StoreError>;
}

/// Repository for Portfolio aggregates, keyed by ID
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// Find a portfolio by its unique identifier
    async fn find_by_id(&self, id: &str) -> Result<Portfolio, StoreError>;

    /// Load every stored portfolio
    async fn find_all(&self) -> Result<Vec<Portfolio>, StoreError>;

    /// Find portfolios matching a risk profile exactly
    async fn search_by_risk_profile(
        &self,
        profile: &RiskProfile,
    ) -> Result<Vec<Portfolio>, StoreError>;

    /// Find portfolios holding at least one company in the given sector
    ///
    /// Resolves holdings through the company repository without holding the
    /// portfolio lock across those calls, so the result is an
    /// eventually-consistent view, not a snapshot.
    async fn search_by_sector(&self, sector: &Sector) -> Result<SectorSearch, StoreError>;

    /// Save a portfolio (insert or update, keyed by ID)
    async fn save(&self, portfolio: &Portfolio) -> Result<(), StoreError>;

    /// Delete a portfolio by ID; fails with `NotFound` when absent
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
