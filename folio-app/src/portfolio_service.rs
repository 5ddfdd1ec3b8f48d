//! Portfolio application service
//!
//! Coordinates the portfolio repository, the company repository (for
//! existence checks when buying), and the injected rebalance planner. Like
//! the company service it is stateless and performs plain read-modify-write
//! cycles without optimistic concurrency.

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use folio_domain::{Money, Portfolio, Position, RebalancePlanner, RiskProfile, Sector};
use folio_store::{CompanyRepository, PortfolioRepository, SectorSearch};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Rebalance suggestions for a portfolio, stamped at generation time
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RebalanceRecommendation {
    /// Portfolio the suggestions apply to
    pub portfolio_id: String,
    /// Human-readable trade suggestions
    pub suggestions: Vec<String>,
    /// When the suggestions were generated
    pub generated_at: DateTime<Utc>,
}

/// Application-level operations on the Portfolio aggregate
pub struct PortfolioService {
    portfolios: Arc<dyn PortfolioRepository>,
    companies: Arc<dyn CompanyRepository>,
    planner: Arc<dyn RebalancePlanner>,
}

impl PortfolioService {
    /// Create a new service over the given repositories and planner
    pub fn new(
        portfolios: Arc<dyn PortfolioRepository>,
        companies: Arc<dyn CompanyRepository>,
        planner: Arc<dyn RebalancePlanner>,
    ) -> Self {
        Self {
            portfolios,
            companies,
            planner,
        }
    }

    /// Create and persist a new portfolio with a generated id
    pub async fn create_portfolio(
        &self,
        risk_profile: RiskProfile,
        initial_cash: Money,
    ) -> ServiceResult<Portfolio> {
        let id = Uuid::now_v7().to_string();
        let portfolio = Portfolio::new(id, risk_profile, initial_cash)?;
        self.portfolios.save(&portfolio).await?;

        info!(portfolio_id = %portfolio.id, "portfolio created");
        Ok(portfolio)
    }

    /// Retrieve a portfolio by id
    pub async fn get_portfolio(&self, id: &str) -> ServiceResult<Portfolio> {
        if id.is_empty() {
            return Err(ServiceError::Validation("id cannot be empty".to_string()));
        }
        Ok(self.portfolios.find_by_id(id).await?)
    }

    /// List every portfolio
    pub async fn list_portfolios(&self) -> ServiceResult<Vec<Portfolio>> {
        Ok(self.portfolios.find_all().await?)
    }

    /// Find portfolios with the given risk profile
    pub async fn search_by_risk_profile(
        &self,
        profile: &RiskProfile,
    ) -> ServiceResult<Vec<Portfolio>> {
        Ok(self.portfolios.search_by_risk_profile(profile).await?)
    }

    /// Find portfolios holding at least one company in the given sector
    ///
    /// The result may be partial: holdings whose company could not be
    /// resolved are reported in `skipped_tickers` rather than failing the
    /// whole search.
    pub async fn search_by_sector(&self, sector: &Sector) -> ServiceResult<SectorSearch> {
        Ok(self.portfolios.search_by_sector(sector).await?)
    }

    /// Buy shares of a company into a portfolio
    ///
    /// The company must exist before any money moves. Total cost is
    /// `price_per_share * shares`, debited from the cash balance; an existing
    /// holding for the same ticker is merged at the share-weighted average
    /// price.
    pub async fn add_position(
        &self,
        portfolio_id: &str,
        ticker: &str,
        shares: u32,
        price_per_share: Money,
    ) -> ServiceResult<Portfolio> {
        // Reject unknown tickers up front so a typo cannot create a holding.
        self.companies.find_by_ticker(ticker).await?;

        let mut portfolio = self.portfolios.find_by_id(portfolio_id).await?;
        let cost = price_per_share.multiply(i64::from(shares))?;
        let position = Position::new(ticker, shares, price_per_share)?;
        portfolio.add_position(position, cost.clone())?;
        self.portfolios.save(&portfolio).await?;

        info!(
            portfolio_id = %portfolio.id,
            ticker,
            shares,
            cost = %cost,
            "position added"
        );
        Ok(portfolio)
    }

    /// Sell shares of a holding, crediting the proceeds to cash
    pub async fn remove_position(
        &self,
        portfolio_id: &str,
        ticker: &str,
        shares: u32,
        price_per_share: Money,
    ) -> ServiceResult<Portfolio> {
        let mut portfolio = self.portfolios.find_by_id(portfolio_id).await?;
        let proceeds = price_per_share.multiply(i64::from(shares))?;
        portfolio.remove_position(ticker, shares, proceeds.clone())?;
        self.portfolios.save(&portfolio).await?;

        info!(
            portfolio_id = %portfolio.id,
            ticker,
            shares,
            proceeds = %proceeds,
            "position removed"
        );
        Ok(portfolio)
    }

    /// Overwrite the share count of an existing holding
    ///
    /// No cash moves; this is a book-keeping correction, not a trade.
    pub async fn adjust_position(
        &self,
        portfolio_id: &str,
        ticker: &str,
        new_shares: u32,
    ) -> ServiceResult<Portfolio> {
        let mut portfolio = self.portfolios.find_by_id(portfolio_id).await?;
        portfolio.set_position_shares(ticker, new_shares)?;
        self.portfolios.save(&portfolio).await?;
        Ok(portfolio)
    }

    /// Replace a portfolio's risk profile
    pub async fn update_risk_profile(
        &self,
        portfolio_id: &str,
        profile: RiskProfile,
    ) -> ServiceResult<Portfolio> {
        let mut portfolio = self.portfolios.find_by_id(portfolio_id).await?;
        portfolio.update_risk_profile(profile);
        self.portfolios.save(&portfolio).await?;
        Ok(portfolio)
    }

    /// Generate rebalance suggestions for a portfolio that is due
    pub async fn recommend_rebalance(
        &self,
        portfolio_id: &str,
    ) -> ServiceResult<RebalanceRecommendation> {
        let portfolio = self.portfolios.find_by_id(portfolio_id).await?;
        let suggestions = portfolio.generate_rebalance_recommendations(self.planner.as_ref())?;
        Ok(RebalanceRecommendation {
            portfolio_id: portfolio.id,
            suggestions,
            generated_at: Utc::now(),
        })
    }

    /// Record that a recommendation has been acted on
    ///
    /// The recommendation content is not interpreted; only the portfolio id
    /// is checked and the rebalance clock reset.
    pub async fn execute_rebalance(
        &self,
        portfolio_id: &str,
        recommendation: &RebalanceRecommendation,
    ) -> ServiceResult<Portfolio> {
        if recommendation.portfolio_id != portfolio_id {
            return Err(ServiceError::Validation(format!(
                "recommendation is for portfolio {}, not {portfolio_id}",
                recommendation.portfolio_id
            )));
        }
        let mut portfolio = self.portfolios.find_by_id(portfolio_id).await?;
        portfolio.mark_rebalanced();
        self.portfolios.save(&portfolio).await?;

        info!(portfolio_id = %portfolio.id, "rebalance executed");
        Ok(portfolio)
    }

    /// Delete a portfolio by id
    pub async fn delete_portfolio(&self, id: &str) -> ServiceResult<()> {
        if id.is_empty() {
            return Err(ServiceError::Validation("id cannot be empty".to_string()));
        }
        self.portfolios.delete(id).await?;
        info!(portfolio_id = id, "portfolio deleted");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
