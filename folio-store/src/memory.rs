//! In-memory repository implementations
//!
//! Used for development and testing without a database.
//! Thread-safe using one RwLock per repository instance: reads share the
//! lock, writes serialize across the whole map regardless of key.

use crate::error::StoreError;
use crate::repository::{CompanyRepository, PortfolioRepository, SectorSearch};
use async_trait::async_trait;
use folio_domain::{Company, Portfolio, RiskProfile, Sector};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::warn;

// =============================================================================
// Company repository
// =============================================================================

/// In-memory company store keyed by ticker
pub struct MemoryCompanyRepository {
    companies: RwLock<HashMap<String, Company>>,
}

impl MemoryCompanyRepository {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            companies: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored companies
    pub fn company_count(&self) -> usize {
        self.companies.read().unwrap().len()
    }

    /// Clear all data (useful for test setup)
    pub fn clear(&self) {
        self.companies.write().unwrap().clear();
    }
}

impl Default for MemoryCompanyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompanyRepository for MemoryCompanyRepository {
    async fn find_by_ticker(&self, ticker: &str) -> Result<Company, StoreError> {
        let companies = self.companies.read().unwrap();
        companies
            .get(ticker)
            .cloned()
            .ok_or_else(|| StoreError::not_found("company", ticker))
    }

    async fn search_by_score_range(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<Company>, StoreError> {
        if min > max {
            return Err(StoreError::InvalidRange { min, max });
        }
        let companies = self.companies.read().unwrap();
        Ok(companies
            .values()
            .filter(|c| c.current_score >= min && c.current_score <= max)
            .cloned()
            .collect())
    }

    async fn save(&self, company: &Company) -> Result<(), StoreError> {
        let mut companies = self.companies.write().unwrap();
        companies.insert(company.ticker.clone(), company.clone());
        Ok(())
    }

    async fn delete(&self, ticker: &str) -> Result<(), StoreError> {
        let mut companies = self.companies.write().unwrap();
        if companies.remove(ticker).is_some() {
            Ok(())
        } else {
            Err(StoreError::not_found("company", ticker))
        }
    }
}

// =============================================================================
// Portfolio repository
// =============================================================================

/// In-memory portfolio store keyed by ID
///
/// Holds a company repository handle for the cross-aggregate sector search.
pub struct MemoryPortfolioRepository {
    portfolios: RwLock<HashMap<String, Portfolio>>,
    companies: Arc<dyn CompanyRepository>,
}

impl MemoryPortfolioRepository {
    /// Create a new empty store backed by the given company repository
    pub fn new(companies: Arc<dyn CompanyRepository>) -> Self {
        Self {
            portfolios: RwLock::new(HashMap::new()),
            companies,
        }
    }

    /// Number of stored portfolios
    pub fn portfolio_count(&self) -> usize {
        self.portfolios.read().unwrap().len()
    }

    /// Clear all data (useful for test setup)
    pub fn clear(&self) {
        self.portfolios.write().unwrap().clear();
    }
}

#[async_trait]
impl PortfolioRepository for MemoryPortfolioRepository {
    async fn find_by_id(&self, id: &str) -> Result<Portfolio, StoreError> {
        let portfolios = self.portfolios.read().unwrap();
        portfolios
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("portfolio", id))
    }

    async fn find_all(&self) -> Result<Vec<Portfolio>, StoreError> {
        let portfolios = self.portfolios.read().unwrap();
        Ok(portfolios.values().cloned().collect())
    }

    async fn search_by_risk_profile(
        &self,
        profile: &RiskProfile,
    ) -> Result<Vec<Portfolio>, StoreError> {
        let portfolios = self.portfolios.read().unwrap();
        Ok(portfolios
            .values()
            .filter(|p| &p.risk_profile == profile)
            .cloned()
            .collect())
    }

    async fn search_by_sector(&self, sector: &Sector) -> Result<SectorSearch, StoreError> {
        // Snapshot under the read lock, then resolve companies with the lock
        // released. A company mutated between snapshot and lookup can produce
        // a stale inclusion decision; there is no cross-repository snapshot.
        let snapshot: Vec<Portfolio> = {
            let portfolios = self.portfolios.read().unwrap();
            portfolios.values().cloned().collect()
        };

        let mut result = SectorSearch::default();
        for portfolio in snapshot {
            let mut tickers: Vec<&String> = portfolio.holdings.keys().collect();
            tickers.sort();

            let mut matched = false;
            for ticker in tickers {
                match self.companies.find_by_ticker(ticker).await {
                    Ok(company) => {
                        if &company.sector == sector {
                            matched = true;
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(
                            portfolio_id = %portfolio.id,
                            ticker = %ticker,
                            error = %err,
                            "skipping unresolvable holding during sector search"
                        );
                        if !result.skipped_tickers.contains(ticker) {
                            result.skipped_tickers.push(ticker.clone());
                        }
                    }
                }
            }
            if matched {
                result.portfolios.push(portfolio);
            }
        }
        Ok(result)
    }

    async fn save(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        let mut portfolios = self.portfolios.write().unwrap();
        portfolios.insert(portfolio.id.clone(), portfolio.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut portfolios = self.portfolios.write().unwrap();
        if portfolios.remove(id).is_some() {
            Ok(())
        } else {
            Err(StoreError::not_found("portfolio", id))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::{FinancialMetrics, Money, Position};

    fn usd(amount: i64) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    fn test_company(ticker: &str, sector: Sector, score: f64) -> Company {
        let mut company =
            Company::new(ticker, FinancialMetrics::new(15.0, 1.5, 0.8), sector).unwrap();
        company.current_score = score;
        company
    }

    fn test_portfolio(id: &str, profile: RiskProfile) -> Portfolio {
        Portfolio::new(id, profile, usd(1_000_000)).unwrap()
    }

    fn with_holding(mut portfolio: Portfolio, ticker: &str) -> Portfolio {
        let position = Position::new(ticker, 5, usd(10_000)).unwrap();
        portfolio.add_position(position, usd(50_000)).unwrap();
        portfolio
    }

    // Company repository tests
    #[tokio::test]
    async fn test_company_save_and_find() {
        let repo = MemoryCompanyRepository::new();
        let company = test_company("AAPL", Sector::Technology, 72.0);

        repo.save(&company).await.unwrap();

        let found = repo.find_by_ticker("AAPL").await.unwrap();
        assert_eq!(found, company);
    }

    #[tokio::test]
    async fn test_company_find_not_found() {
        let repo = MemoryCompanyRepository::new();
        let err = repo.find_by_ticker("NOPE").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_company_save_upserts() {
        let repo = MemoryCompanyRepository::new();
        let mut company = test_company("AAPL", Sector::Technology, 10.0);
        repo.save(&company).await.unwrap();

        company.current_score = 90.0;
        repo.save(&company).await.unwrap();

        assert_eq!(repo.company_count(), 1);
        let found = repo.find_by_ticker("AAPL").await.unwrap();
        assert_eq!(found.current_score, 90.0);
    }

    #[tokio::test]
    async fn test_company_score_range_inclusive() {
        let repo = MemoryCompanyRepository::new();
        repo.save(&test_company("LOW", Sector::Energy, 10.0)).await.unwrap();
        repo.save(&test_company("MID", Sector::Energy, 50.0)).await.unwrap();
        repo.save(&test_company("HIGH", Sector::Energy, 90.0)).await.unwrap();

        let found = repo.search_by_score_range(10.0, 50.0).await.unwrap();
        let mut tickers: Vec<String> = found.into_iter().map(|c| c.ticker).collect();
        tickers.sort();
        assert_eq!(tickers, vec!["LOW", "MID"]);
    }

    #[tokio::test]
    async fn test_company_score_range_invalid() {
        let repo = MemoryCompanyRepository::new();
        let err = repo.search_by_score_range(60.0, 40.0).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn test_company_delete() {
        let repo = MemoryCompanyRepository::new();
        repo.save(&test_company("AAPL", Sector::Technology, 50.0)).await.unwrap();

        repo.delete("AAPL").await.unwrap();
        assert_eq!(repo.company_count(), 0);
        assert!(repo.find_by_ticker("AAPL").await.unwrap_err().is_not_found());

        assert!(repo.delete("AAPL").await.unwrap_err().is_not_found());
    }

    // Portfolio repository tests
    fn paired_repos() -> (Arc<MemoryCompanyRepository>, MemoryPortfolioRepository) {
        let companies = Arc::new(MemoryCompanyRepository::new());
        let portfolios = MemoryPortfolioRepository::new(companies.clone());
        (companies, portfolios)
    }

    #[tokio::test]
    async fn test_portfolio_save_find_delete() {
        let (_, repo) = paired_repos();
        let portfolio = test_portfolio("p-1", RiskProfile::Moderate);

        repo.save(&portfolio).await.unwrap();
        let found = repo.find_by_id("p-1").await.unwrap();
        assert_eq!(found, portfolio);

        repo.delete("p-1").await.unwrap();
        assert!(repo.find_by_id("p-1").await.unwrap_err().is_not_found());
        assert!(repo.delete("p-1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_portfolio_find_all() {
        let (_, repo) = paired_repos();
        repo.save(&test_portfolio("p-1", RiskProfile::Moderate)).await.unwrap();
        repo.save(&test_portfolio("p-2", RiskProfile::Aggressive)).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_portfolio_search_by_risk_profile() {
        let (_, repo) = paired_repos();
        repo.save(&test_portfolio("p-1", RiskProfile::Moderate)).await.unwrap();
        repo.save(&test_portfolio("p-2", RiskProfile::Aggressive)).await.unwrap();
        repo.save(&test_portfolio("p-3", RiskProfile::Moderate)).await.unwrap();

        let found = repo
            .search_by_risk_profile(&RiskProfile::Moderate)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_sector_search_includes_portfolio_once() {
        let (companies, repo) = paired_repos();
        companies.save(&test_company("AAPL", Sector::Technology, 50.0)).await.unwrap();
        companies.save(&test_company("MSFT", Sector::Technology, 60.0)).await.unwrap();
        companies.save(&test_company("XOM", Sector::Energy, 40.0)).await.unwrap();

        // Two tech holdings in one portfolio, one energy holding in another.
        let tech = with_holding(
            with_holding(test_portfolio("p-tech", RiskProfile::Moderate), "AAPL"),
            "MSFT",
        );
        let energy = with_holding(test_portfolio("p-energy", RiskProfile::Moderate), "XOM");
        repo.save(&tech).await.unwrap();
        repo.save(&energy).await.unwrap();

        let result = repo.search_by_sector(&Sector::Technology).await.unwrap();
        assert_eq!(result.portfolios.len(), 1);
        assert_eq!(result.portfolios[0].id, "p-tech");
        assert!(result.skipped_tickers.is_empty());
    }

    #[tokio::test]
    async fn test_sector_search_reports_unresolvable_holdings() {
        let (companies, repo) = paired_repos();
        companies.save(&test_company("XOM", Sector::Energy, 40.0)).await.unwrap();

        // GHOST is held but was never saved as a company.
        let portfolio = with_holding(
            with_holding(test_portfolio("p-1", RiskProfile::Moderate), "GHOST"),
            "XOM",
        );
        repo.save(&portfolio).await.unwrap();

        let result = repo.search_by_sector(&Sector::Energy).await.unwrap();
        assert_eq!(result.portfolios.len(), 1);
        assert_eq!(result.skipped_tickers, vec!["GHOST"]);
    }

    #[tokio::test]
    async fn test_sector_search_no_match() {
        let (companies, repo) = paired_repos();
        companies.save(&test_company("XOM", Sector::Energy, 40.0)).await.unwrap();
        let portfolio = with_holding(test_portfolio("p-1", RiskProfile::Moderate), "XOM");
        repo.save(&portfolio).await.unwrap();

        let result = repo.search_by_sector(&Sector::Healthcare).await.unwrap();
        assert!(result.portfolios.is_empty());
    }

    // Concurrency: concurrent saves never corrupt the map; one write wins per key.
    #[tokio::test]
    async fn test_concurrent_company_saves() {
        let repo = Arc::new(MemoryCompanyRepository::new());

        let mut handles = Vec::new();
        for worker in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    // Distinct keys per worker plus one contended key.
                    let own = test_company(
                        &format!("T{worker}-{i}"),
                        Sector::Technology,
                        f64::from(worker),
                    );
                    repo.save(&own).await.unwrap();
                    let contended =
                        test_company("SHARED", Sector::Technology, f64::from(worker));
                    repo.save(&contended).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.company_count(), 16 * 50 + 1);
        let shared = repo.find_by_ticker("SHARED").await.unwrap();
        assert!((0.0..16.0).contains(&shared.current_score));
    }

    #[tokio::test]
    async fn test_concurrent_portfolio_saves_and_reads() {
        let (_, repo) = paired_repos();
        let repo = Arc::new(repo);

        let mut handles = Vec::new();
        for worker in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..25 {
                    let portfolio =
                        test_portfolio(&format!("p-{worker}-{i}"), RiskProfile::Moderate);
                    repo.save(&portfolio).await.unwrap();
                    let _ = repo.find_all().await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.portfolio_count(), 8 * 25);
    }
}
