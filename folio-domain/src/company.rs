//! Company aggregate
//!
//! Ticker-keyed aggregate root holding financial metrics, sector, and the
//! current value score. Enforces metrics staleness; score range is an
//! opt-in query (`score_in_range`), never checked automatically.

use crate::scoring::ScoreModel;
use crate::value_objects::{DomainError, FinancialMetrics, Sector};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A publicly traded company and its value analysis state
///
/// Aggregate root; identity is the ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Unique stock ticker (primary key)
    pub ticker: String,
    /// Latest recorded financial ratios
    pub financial_metrics: FinancialMetrics,
    /// Current value score, nominally in [0, 100]
    pub current_score: f64,
    /// Industry sector
    pub sector: Sector,
    /// Last time any field of this aggregate changed
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Metrics older than this many days are considered stale
    pub const METRICS_STALE_DAYS: i64 = 7;

    /// Create a new Company
    ///
    /// The score starts at 0 until a model recalculates it.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidTicker` if the ticker is empty
    pub fn new(
        ticker: impl Into<String>,
        metrics: FinancialMetrics,
        sector: Sector,
    ) -> Result<Self, DomainError> {
        let ticker = ticker.into();
        if ticker.is_empty() {
            return Err(DomainError::InvalidTicker(
                "ticker cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            ticker,
            financial_metrics: metrics,
            current_score: 0.0,
            sector,
            updated_at: Utc::now(),
        })
    }

    /// Check whether the financial metrics are still fresh
    ///
    /// False when metrics were never recorded or when their age is
    /// `METRICS_STALE_DAYS` or more; exactly at the boundary counts as stale.
    pub fn has_fresh_metrics(&self) -> bool {
        match self.financial_metrics.metrics_updated_at {
            None => false,
            Some(stamped_at) => {
                Utc::now() - stamped_at < Duration::days(Self::METRICS_STALE_DAYS)
            }
        }
    }

    /// Check whether the current score sits in the valid [0, 100] range
    ///
    /// Opt-in query: callers decide when to check. Mutations do not run it.
    pub fn score_in_range(&self) -> bool {
        (0.0..=100.0).contains(&self.current_score)
    }

    /// Re-stamp stale metrics
    ///
    /// No-op when metrics are fresh. When stale, re-stamps
    /// `metrics_updated_at` and `updated_at`; fetching replacement data from
    /// an external source is a collaborator concern outside this aggregate.
    pub fn refresh_stale_metrics(&mut self) {
        if self.has_fresh_metrics() {
            return;
        }
        let now = Utc::now();
        self.financial_metrics.metrics_updated_at = Some(now);
        self.updated_at = now;
    }

    /// Recalculate the score from the injected model
    pub fn recalculate_score(&mut self, model: &dyn ScoreModel) {
        self.current_score = model.score(&self.financial_metrics);
        self.updated_at = Utc::now();
    }

    /// Replace the financial metrics wholesale and recalculate the score
    ///
    /// The timestamp on the incoming metrics is ignored; the aggregate
    /// stamps `metrics_updated_at` itself.
    pub fn update_financial_metrics(
        &mut self,
        new_metrics: FinancialMetrics,
        model: &dyn ScoreModel,
    ) {
        let now = Utc::now();
        self.financial_metrics = new_metrics;
        self.financial_metrics.metrics_updated_at = Some(now);
        self.updated_at = now;
        self.recalculate_score(model);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RatioDecayModel;

    fn metrics() -> FinancialMetrics {
        FinancialMetrics::new(15.0, 1.5, 0.8)
    }

    #[test]
    fn test_new_company_rejects_empty_ticker() {
        let result = Company::new("", metrics(), Sector::Technology);
        assert!(matches!(result, Err(DomainError::InvalidTicker(_))));
    }

    #[test]
    fn test_new_company_initial_state() {
        let before = Utc::now();
        let company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();
        assert_eq!(company.current_score, 0.0);
        assert_eq!(company.sector, Sector::Technology);
        assert!(company.updated_at >= before);
        assert!(company.updated_at <= Utc::now());
    }

    #[test]
    fn test_fresh_metrics_false_when_never_recorded() {
        let mut company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();
        company.financial_metrics.metrics_updated_at = None;
        assert!(!company.has_fresh_metrics());
    }

    #[test]
    fn test_fresh_metrics_boundary_exactly_seven_days_is_stale() {
        let mut company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();
        company.financial_metrics.metrics_updated_at =
            Some(Utc::now() - Duration::days(Company::METRICS_STALE_DAYS));
        assert!(!company.has_fresh_metrics());

        company.financial_metrics.metrics_updated_at =
            Some(Utc::now() - Duration::days(Company::METRICS_STALE_DAYS) + Duration::hours(1));
        assert!(company.has_fresh_metrics());
    }

    #[test]
    fn test_score_in_range_is_inclusive() {
        let mut company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();
        for (score, valid) in [(0.0, true), (100.0, true), (-0.1, false), (100.1, false)] {
            company.current_score = score;
            assert_eq!(company.score_in_range(), valid, "score {score}");
        }
    }

    #[test]
    fn test_score_not_enforced_on_mutation() {
        // An out-of-range score persists silently until a caller asks.
        let mut company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();
        company.current_score = 250.0;
        company.refresh_stale_metrics();
        assert_eq!(company.current_score, 250.0);
    }

    #[test]
    fn test_refresh_noop_when_fresh() {
        let mut company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();
        let stamped = company.financial_metrics.metrics_updated_at;
        let updated = company.updated_at;
        company.refresh_stale_metrics();
        assert_eq!(company.financial_metrics.metrics_updated_at, stamped);
        assert_eq!(company.updated_at, updated);
    }

    #[test]
    fn test_refresh_restamps_when_stale() {
        let mut company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();
        let old = Utc::now() - Duration::days(30);
        company.financial_metrics.metrics_updated_at = Some(old);
        company.refresh_stale_metrics();

        let restamped = company.financial_metrics.metrics_updated_at.unwrap();
        assert!(restamped > old);
        assert!(company.has_fresh_metrics());
        // Metric values themselves are untouched.
        assert_eq!(company.financial_metrics.pe_ratio, 15.0);
    }

    #[test]
    fn test_update_metrics_ignores_incoming_timestamp() {
        let model = RatioDecayModel::default();
        let mut company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();

        let mut incoming = FinancialMetrics::new(8.0, 0.9, 0.2);
        incoming.metrics_updated_at = Some(Utc::now() - Duration::days(365));

        let before = Utc::now();
        company.update_financial_metrics(incoming, &model);

        assert_eq!(company.financial_metrics.pe_ratio, 8.0);
        assert!(company.financial_metrics.metrics_updated_at.unwrap() >= before);
        assert!(company.updated_at >= before);
    }

    #[test]
    fn test_update_metrics_recalculates_score() {
        let model = RatioDecayModel::default();
        let mut company = Company::new("AAPL", metrics(), Sector::Technology).unwrap();
        assert_eq!(company.current_score, 0.0);

        company.update_financial_metrics(FinancialMetrics::new(8.0, 0.9, 0.2), &model);
        assert!(company.current_score > 0.0);
        assert!(company.score_in_range());
    }
}
