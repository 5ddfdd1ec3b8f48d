//! Portfolio aggregate
//!
//! ID-keyed aggregate root owning a cash balance and a ticker-keyed map of
//! holdings. All cash and position mutations flow through this type so the
//! non-negative-cash invariant cannot be violated through the public API.

use crate::scoring::RebalancePlanner;
use crate::value_objects::{DomainError, Money, Position, RiskProfile};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An investment portfolio
///
/// Aggregate root; identity is the string ID. Cross-aggregate references
/// (held companies) are by ticker only, resolved through repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Unique identifier
    pub id: String,
    /// Holdings keyed by company ticker
    pub holdings: HashMap<String, Position>,
    /// Current cash balance
    pub cash_balance: Money,
    /// Investor's risk tolerance
    pub risk_profile: RiskProfile,
    /// When the portfolio was last rebalanced (None = never)
    pub last_rebalance_time: Option<DateTime<Utc>>,
    /// Last time any field of this aggregate changed
    pub updated_at: DateTime<Utc>,
}

impl Portfolio {
    /// A rebalance is due again this many days after the last one
    pub const REBALANCE_INTERVAL_DAYS: i64 = 90;

    /// Create a new Portfolio with empty holdings
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPortfolioId` if the id is empty and
    /// `DomainError::NegativeCash` if the initial balance is negative
    pub fn new(
        id: impl Into<String>,
        risk_profile: RiskProfile,
        initial_cash: Money,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidPortfolioId(
                "portfolio ID cannot be empty".to_string(),
            ));
        }
        if initial_cash.is_negative() {
            return Err(DomainError::NegativeCash(
                "initial cash balance cannot be negative".to_string(),
            ));
        }
        Ok(Self {
            id,
            holdings: HashMap::new(),
            cash_balance: initial_cash,
            risk_profile,
            last_rebalance_time: None,
            updated_at: Utc::now(),
        })
    }

    /// Check the non-negative-cash invariant
    pub fn validate_cash_balance(&self) -> bool {
        !self.cash_balance.is_negative()
    }

    /// Check whether a rebalance is due
    ///
    /// True when the portfolio has never been rebalanced, or when more than
    /// `REBALANCE_INTERVAL_DAYS` have elapsed since the last one. This is a
    /// coarse time trigger; allocation deviation is a planner concern.
    pub fn rebalance_due(&self) -> bool {
        match self.last_rebalance_time {
            None => true,
            Some(last) => Utc::now() - last > Duration::days(Self::REBALANCE_INTERVAL_DAYS),
        }
    }

    /// Buy into a position, debiting its cost from the cash balance
    ///
    /// When a holding already exists for the ticker the shares are merged:
    /// counts summed and the purchase price recomputed as the share-weighted
    /// average (integer division, remainder dropped). On any error neither
    /// cash nor holdings change.
    ///
    /// # Errors
    /// `CurrencyMismatch` when the cost currency differs from the cash
    /// currency, `InsufficientCash` when the current balance cannot cover
    /// the cost, `Overflow` when merging would exceed the representable
    /// share count or combined cost basis.
    pub fn add_position(&mut self, position: Position, cost: Money) -> Result<(), DomainError> {
        if self.cash_balance.currency != cost.currency {
            return Err(DomainError::CurrencyMismatch {
                expected: self.cash_balance.currency.clone(),
                actual: cost.currency,
            });
        }
        if self.cash_balance.amount < cost.amount {
            return Err(DomainError::InsufficientCash {
                available: self.cash_balance.amount,
                required: cost.amount,
            });
        }

        let merged = match self.holdings.get(&position.company_ticker) {
            Some(existing) => Self::merge_positions(existing, &position)?,
            None => position,
        };

        self.cash_balance = self.cash_balance.subtract(&cost)?;
        self.holdings
            .insert(merged.company_ticker.clone(), merged);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Sell out of a position, crediting the proceeds to the cash balance
    ///
    /// Reduces the holding's share count and deletes the entry when it
    /// reaches zero.
    ///
    /// # Errors
    /// `UnknownPosition` when the ticker is not held, `InvalidShares` when
    /// zero shares are requested, `InsufficientShares` when more shares are
    /// requested than held, `CurrencyMismatch` on the proceeds currency,
    /// `Overflow` when crediting the proceeds would exceed `i64`.
    pub fn remove_position(
        &mut self,
        ticker: &str,
        shares_to_remove: u32,
        proceeds: Money,
    ) -> Result<(), DomainError> {
        if shares_to_remove == 0 {
            return Err(DomainError::InvalidShares(
                "shares to remove must be positive".to_string(),
            ));
        }
        let held = self
            .holdings
            .get(ticker)
            .ok_or_else(|| DomainError::UnknownPosition(ticker.to_string()))?
            .shares;
        if shares_to_remove > held {
            return Err(DomainError::InsufficientShares {
                held,
                requested: shares_to_remove,
            });
        }

        self.cash_balance = self.cash_balance.add(&proceeds)?;
        if shares_to_remove == held {
            self.holdings.remove(ticker);
        } else if let Some(position) = self.holdings.get_mut(ticker) {
            position.shares -= shares_to_remove;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Overwrite the share count of an existing holding
    ///
    /// Known gap carried over from the original design: the cash balance is
    /// NOT adjusted. Use `add_position`/`remove_position` for cash-correct
    /// changes.
    ///
    /// # Errors
    /// `UnknownPosition` when the ticker is not held, `InvalidShares` when
    /// the new count is zero.
    pub fn set_position_shares(
        &mut self,
        ticker: &str,
        new_shares: u32,
    ) -> Result<(), DomainError> {
        if new_shares == 0 {
            return Err(DomainError::InvalidShares(
                "new share count must be positive; use remove_position to close".to_string(),
            ));
        }
        let position = self
            .holdings
            .get_mut(ticker)
            .ok_or_else(|| DomainError::UnknownPosition(ticker.to_string()))?;
        position.shares = new_shares;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Generate rebalance suggestions through the injected planner
    ///
    /// # Errors
    /// `RebalanceNotDue` when `rebalance_due()` is false; planner errors
    /// pass through
    pub fn generate_rebalance_recommendations(
        &self,
        planner: &dyn RebalancePlanner,
    ) -> Result<Vec<String>, DomainError> {
        if !self.rebalance_due() {
            return Err(DomainError::RebalanceNotDue);
        }
        planner.plan(self)
    }

    /// Record that a rebalance was applied
    pub fn mark_rebalanced(&mut self) {
        let now = Utc::now();
        self.last_rebalance_time = Some(now);
        self.updated_at = now;
    }

    /// Replace the risk profile unconditionally
    pub fn update_risk_profile(&mut self, new_profile: RiskProfile) {
        self.risk_profile = new_profile;
        self.updated_at = Utc::now();
    }

    /// Look up the holding for a ticker
    pub fn position(&self, ticker: &str) -> Option<&Position> {
        self.holdings.get(ticker)
    }

    // Share-weighted average purchase price. Remainder from the integer
    // division is dropped.
    fn merge_positions(existing: &Position, incoming: &Position) -> Result<Position, DomainError> {
        if existing.purchase_price.currency != incoming.purchase_price.currency {
            return Err(DomainError::CurrencyMismatch {
                expected: existing.purchase_price.currency.clone(),
                actual: incoming.purchase_price.currency.clone(),
            });
        }
        let total_shares = existing.shares.checked_add(incoming.shares).ok_or_else(|| {
            DomainError::Overflow(format!(
                "{} + {} shares",
                existing.shares, incoming.shares
            ))
        })?;
        let combined_basis = existing.cost_basis()?.add(&incoming.cost_basis()?)?;
        let blended = combined_basis.amount / i64::from(total_shares);
        Position::new(
            existing.company_ticker.clone(),
            total_shares,
            Money::new(blended, existing.purchase_price.currency.clone())?,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
