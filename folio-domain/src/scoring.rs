//! Pluggable valuation and rebalance strategies
//!
//! The concrete scoring formula and rebalance computation are product
//! decisions, not domain invariants, so the aggregates depend on these
//! traits rather than on a fixed formula. `RatioDecayModel` and
//! `EqualWeightPlanner` are the defaults wired by the daemon.

use crate::portfolio::Portfolio;
use crate::value_objects::{DomainError, FinancialMetrics};

/// Maximum score a company can hold
pub const MAX_SCORE: f64 = 100.0;

/// Strategy for computing a company's value score from its metrics
pub trait ScoreModel: Send + Sync {
    /// Compute the score, expected to land in `[0, MAX_SCORE]`
    fn score(&self, metrics: &FinancialMetrics) -> f64;
}

/// Strategy for producing rebalance suggestions for a portfolio
pub trait RebalancePlanner: Send + Sync {
    /// Produce human-readable buy/sell suggestions
    ///
    /// # Errors
    /// `DomainError::Overflow` when a holding's cost basis exceeds the
    /// representable range
    fn plan(&self, portfolio: &Portfolio) -> Result<Vec<String>, DomainError>;
}

// =============================================================================
// RatioDecayModel
// =============================================================================

/// Default scoring model: lower ratios score higher
///
/// Each ratio maps to a subscore `100 * anchor / (anchor + max(ratio, 0))`,
/// so a ratio equal to its anchor scores 50 and the subscore decays smoothly
/// toward 0 as the ratio grows. The final score is the mean of the three
/// subscores, clamped to `[0, 100]`. Anchors default to Graham-style
/// thresholds (PE 15, PB 1.5, D/E 1.0) and are configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioDecayModel {
    /// P/E ratio scoring anchor
    pub pe_anchor: f64,
    /// P/B ratio scoring anchor
    pub pb_anchor: f64,
    /// Debt-to-equity scoring anchor
    pub debt_anchor: f64,
}

impl RatioDecayModel {
    /// Create a model with explicit anchors
    pub fn new(pe_anchor: f64, pb_anchor: f64, debt_anchor: f64) -> Self {
        Self {
            pe_anchor,
            pb_anchor,
            debt_anchor,
        }
    }

    fn subscore(anchor: f64, ratio: f64) -> f64 {
        MAX_SCORE * anchor / (anchor + ratio.max(0.0))
    }
}

impl Default for RatioDecayModel {
    fn default() -> Self {
        Self {
            pe_anchor: 15.0,
            pb_anchor: 1.5,
            debt_anchor: 1.0,
        }
    }
}

impl ScoreModel for RatioDecayModel {
    fn score(&self, metrics: &FinancialMetrics) -> f64 {
        let pe = Self::subscore(self.pe_anchor, metrics.pe_ratio);
        let pb = Self::subscore(self.pb_anchor, metrics.pb_ratio);
        let debt = Self::subscore(self.debt_anchor, metrics.debt_to_equity);
        ((pe + pb + debt) / 3.0).clamp(0.0, MAX_SCORE)
    }
}

// =============================================================================
// EqualWeightPlanner
// =============================================================================

/// Default rebalance planner: equal-weight target over current holdings
///
/// Compares each holding's cost basis against the equal-weight share of the
/// portfolio's total cost basis and suggests trimming overweight holdings
/// and adding to underweight ones. Working from cost basis (no live prices
/// at this layer) keeps the plan deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeightPlanner;

impl RebalancePlanner for EqualWeightPlanner {
    fn plan(&self, portfolio: &Portfolio) -> Result<Vec<String>, DomainError> {
        if portfolio.holdings.is_empty() {
            return Ok(vec![format!(
                "Portfolio holds no positions; consider deploying {} of idle cash",
                portfolio.cash_balance
            )]);
        }

        let mut total: i64 = 0;
        for position in portfolio.holdings.values() {
            total = total
                .checked_add(position.cost_basis()?.amount)
                .ok_or_else(|| {
                    DomainError::Overflow("combined cost basis".to_string())
                })?;
        }
        let target = total / portfolio.holdings.len() as i64;

        let mut tickers: Vec<&String> = portfolio.holdings.keys().collect();
        tickers.sort();

        let mut suggestions = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let basis = portfolio.holdings[ticker].cost_basis()?;
            let delta = basis.amount - target;
            if delta > 0 {
                suggestions.push(format!(
                    "Trim {ticker}: overweight by {delta} {} against equal-weight target",
                    basis.currency
                ));
            } else if delta < 0 {
                suggestions.push(format!(
                    "Add to {ticker}: underweight by {} {} against equal-weight target",
                    -delta, basis.currency
                ));
            } else {
                suggestions.push(format!("Hold {ticker}: at equal-weight target"));
            }
        }
        Ok(suggestions)
    }
}

// =============================================================================
// Tests
// =============================================================================
