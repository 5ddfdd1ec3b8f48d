//! Company application service
//!
//! Orchestrates repository calls and domain methods for each company use
//! case. Stateless: every operation is a plain read-modify-write with no
//! optimistic-concurrency check, so a second concurrent writer can overwrite
//! the first (the storage layer serializes individual saves, nothing more).

use crate::error::{ServiceError, ServiceResult};
use folio_domain::{Company, FinancialMetrics, ScoreModel, Sector};
use folio_store::CompanyRepository;
use std::sync::Arc;
use tracing::info;

/// Application-level operations on the Company aggregate
pub struct CompanyService {
    repo: Arc<dyn CompanyRepository>,
    score_model: Arc<dyn ScoreModel>,
}

impl CompanyService {
    /// Create a new service over the given repository and scoring model
    pub fn new(repo: Arc<dyn CompanyRepository>, score_model: Arc<dyn ScoreModel>) -> Self {
        Self { repo, score_model }
    }

    /// Retrieve a company by ticker
    pub async fn get_company(&self, ticker: &str) -> ServiceResult<Company> {
        if ticker.is_empty() {
            return Err(ServiceError::Validation(
                "ticker cannot be empty".to_string(),
            ));
        }
        Ok(self.repo.find_by_ticker(ticker).await?)
    }

    /// Find companies scoring within `[min, max]` inclusive
    pub async fn search_by_score(&self, min: f64, max: f64) -> ServiceResult<Vec<Company>> {
        if min > max {
            return Err(ServiceError::Validation(format!(
                "min score {min} cannot be greater than max score {max}"
            )));
        }
        Ok(self.repo.search_by_score_range(min, max).await?)
    }

    /// Create and persist a new company
    ///
    /// The initial score is computed from the injected model so a freshly
    /// created company is immediately searchable by score.
    pub async fn create_company(
        &self,
        ticker: &str,
        metrics: FinancialMetrics,
        sector: Sector,
    ) -> ServiceResult<Company> {
        match self.repo.find_by_ticker(ticker).await {
            Ok(_) => {
                return Err(ServiceError::AlreadyExists {
                    entity_type: "company".to_string(),
                    id: ticker.to_string(),
                })
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err.into()),
        }

        let mut company = Company::new(ticker, metrics, sector)?;
        company.recalculate_score(self.score_model.as_ref());
        self.repo.save(&company).await?;

        info!(ticker = %company.ticker, score = company.current_score, "company created");
        Ok(company)
    }

    /// Replace a company's financial metrics and recalculate its score
    pub async fn update_metrics(
        &self,
        ticker: &str,
        new_metrics: FinancialMetrics,
    ) -> ServiceResult<Company> {
        if ticker.is_empty() {
            return Err(ServiceError::Validation(
                "ticker cannot be empty".to_string(),
            ));
        }
        let mut company = self.repo.find_by_ticker(ticker).await?;
        company.update_financial_metrics(new_metrics, self.score_model.as_ref());
        self.repo.save(&company).await?;

        info!(ticker = %company.ticker, score = company.current_score, "metrics updated");
        Ok(company)
    }

    /// Refresh a company's metrics timestamps when they are stale
    pub async fn refresh_company(&self, ticker: &str) -> ServiceResult<Company> {
        if ticker.is_empty() {
            return Err(ServiceError::Validation(
                "ticker cannot be empty".to_string(),
            ));
        }
        let mut company = self.repo.find_by_ticker(ticker).await?;
        company.refresh_stale_metrics();
        self.repo.save(&company).await?;
        Ok(company)
    }

    /// Delete a company by ticker
    pub async fn delete_company(&self, ticker: &str) -> ServiceResult<()> {
        if ticker.is_empty() {
            return Err(ServiceError::Validation(
                "ticker cannot be empty".to_string(),
            ));
        }
        self.repo.delete(ticker).await?;
        info!(ticker, "company deleted");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use folio_domain::RatioDecayModel;
    use folio_store::MemoryCompanyRepository;

    fn service() -> (Arc<MemoryCompanyRepository>, CompanyService) {
        let repo = Arc::new(MemoryCompanyRepository::new());
        let service = CompanyService::new(repo.clone(), Arc::new(RatioDecayModel::default()));
        (repo, service)
    }

    fn metrics() -> FinancialMetrics {
        FinancialMetrics::new(15.0, 1.5, 1.0)
    }

    #[tokio::test]
    async fn test_create_and_get_company() {
        let (_, service) = service();

        let created = service
            .create_company("AAPL", metrics(), Sector::Technology)
            .await
            .unwrap();
        assert!(created.current_score > 0.0);

        let fetched = service.get_company("AAPL").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_rejected() {
        let (_, service) = service();
        service
            .create_company("AAPL", metrics(), Sector::Technology)
            .await
            .unwrap();

        let err = service
            .create_company("AAPL", metrics(), Sector::Technology)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_create_empty_ticker_rejected() {
        let (_, service) = service();
        let err = service
            .create_company("", metrics(), Sector::Technology)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(_)));
    }

    #[tokio::test]
    async fn test_get_company_validation_and_not_found() {
        let (_, service) = service();
        assert!(matches!(
            service.get_company("").await.unwrap_err(),
            ServiceError::Validation(_)
        ));
        assert!(service.get_company("NOPE").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_search_by_score_validates_range() {
        let (_, service) = service();
        let err = service.search_by_score(80.0, 20.0).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_search_by_score_finds_created_companies() {
        let (_, service) = service();
        service
            .create_company("AAPL", metrics(), Sector::Technology)
            .await
            .unwrap();

        let found = service.search_by_score(0.0, 100.0).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_update_metrics_persists_new_score() {
        let (repo, service) = service();
        let created = service
            .create_company("AAPL", metrics(), Sector::Technology)
            .await
            .unwrap();

        let updated = service
            .update_metrics("AAPL", FinancialMetrics::new(8.0, 0.9, 0.2))
            .await
            .unwrap();
        assert!(updated.current_score > created.current_score);

        let stored = repo.find_by_ticker("AAPL").await.unwrap();
        assert_eq!(stored.current_score, updated.current_score);
    }

    #[tokio::test]
    async fn test_update_metrics_unknown_ticker() {
        let (_, service) = service();
        let err = service
            .update_metrics("NOPE", metrics())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_refresh_restamps_stale_company() {
        let (repo, service) = service();
        let mut company = service
            .create_company("AAPL", metrics(), Sector::Technology)
            .await
            .unwrap();

        // Age the metrics past the staleness window behind the service's back.
        let old = Utc::now() - Duration::days(30);
        company.financial_metrics.metrics_updated_at = Some(old);
        repo.save(&company).await.unwrap();

        let refreshed = service.refresh_company("AAPL").await.unwrap();
        assert!(refreshed.financial_metrics.metrics_updated_at.unwrap() > old);
        assert!(refreshed.has_fresh_metrics());
    }

    #[tokio::test]
    async fn test_delete_company() {
        let (_, service) = service();
        service
            .create_company("AAPL", metrics(), Sector::Technology)
            .await
            .unwrap();

        service.delete_company("AAPL").await.unwrap();
        assert!(service.get_company("AAPL").await.unwrap_err().is_not_found());
        assert!(service
            .delete_company("AAPL")
            .await
            .unwrap_err()
            .is_not_found());
    }
}
