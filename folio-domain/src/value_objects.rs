//! Value Objects for the Folio Domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object and aggregate validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Currency code must be non-empty
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// Arithmetic between two different currencies
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        /// Currency of the left operand
        expected: String,
        /// Currency of the right operand
        actual: String,
    },

    /// Ticker must be non-empty
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Share count must be positive
    #[error("Invalid shares: {0}")]
    InvalidShares(String),

    /// Portfolio ID must be non-empty
    #[error("Invalid portfolio ID: {0}")]
    InvalidPortfolioId(String),

    /// Initial cash balance cannot be negative
    #[error("Negative cash balance: {0}")]
    NegativeCash(String),

    /// Cash balance too low for the requested purchase
    #[error("Insufficient cash: available {available}, required {required}")]
    InsufficientCash {
        /// Current cash balance in minor units
        available: i64,
        /// Cost of the position in minor units
        required: i64,
    },

    /// No holding exists for the given ticker
    #[error("Unknown position: {0}")]
    UnknownPosition(String),

    /// More shares requested than held
    #[error("Insufficient shares: held {held}, requested {requested}")]
    InsufficientShares {
        /// Shares currently held
        held: u32,
        /// Shares requested for removal
        requested: u32,
    },

    /// Rebalance recommendations requested before the trigger fires
    #[error("Rebalance not currently due")]
    RebalanceNotDue,

    /// Integer arithmetic exceeded the representable range
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

// =============================================================================
// Money
// =============================================================================

/// Money represents a monetary value in minor currency units
///
/// Amounts are stored in the smallest denomination of the currency
/// (e.g., cents for USD) so arithmetic stays exact integer math.
///
/// # Invariants
/// - Currency code must be non-empty
/// - Arithmetic is only defined between equal currencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor currency units
    pub amount: i64,
    /// Currency code (e.g., "USD", "EUR")
    pub currency: String,
}

impl Money {
    /// Create a new Money value with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidCurrency` if the currency code is empty
    pub fn new(amount: i64, currency: impl Into<String>) -> Result<Self, DomainError> {
        let currency = currency.into();
        if currency.is_empty() {
            return Err(DomainError::InvalidCurrency(
                "currency cannot be empty".to_string(),
            ));
        }
        Ok(Self { amount, currency })
    }

    /// Return a new Money holding the sum of `self` and `other`
    ///
    /// # Errors
    /// Returns `DomainError::CurrencyMismatch` if the currencies differ and
    /// `DomainError::Overflow` if the sum leaves the `i64` range
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        self.check_currency(other)?;
        let amount = self.amount.checked_add(other.amount).ok_or_else(|| {
            DomainError::Overflow(format!("{} + {}", self.amount, other.amount))
        })?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Return a new Money holding the difference of `self` and `other`
    ///
    /// # Errors
    /// Returns `DomainError::CurrencyMismatch` if the currencies differ and
    /// `DomainError::Overflow` if the difference leaves the `i64` range
    pub fn subtract(&self, other: &Money) -> Result<Money, DomainError> {
        self.check_currency(other)?;
        let amount = self.amount.checked_sub(other.amount).ok_or_else(|| {
            DomainError::Overflow(format!("{} - {}", self.amount, other.amount))
        })?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Return a new Money scaled by an integer factor (e.g., price per share × shares)
    ///
    /// # Errors
    /// Returns `DomainError::Overflow` if the product leaves the `i64` range
    pub fn multiply(&self, factor: i64) -> Result<Money, DomainError> {
        let amount = self.amount.checked_mul(factor).ok_or_else(|| {
            DomainError::Overflow(format!("{} * {}", self.amount, factor))
        })?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Check if the amount is exactly zero
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Check if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    fn check_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                expected: self.currency.clone(),
                actual: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

// =============================================================================
// FinancialMetrics
// =============================================================================

/// Key financial ratios for a company
///
/// `metrics_updated_at` is `None` until metrics have been recorded at least
/// once; the constructor stamps the current time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    /// Price-to-Earnings ratio
    pub pe_ratio: f64,
    /// Price-to-Book ratio
    pub pb_ratio: f64,
    /// Debt-to-Equity ratio
    pub debt_to_equity: f64,
    /// When these metrics were last updated (None = never recorded)
    pub metrics_updated_at: Option<DateTime<Utc>>,
}

impl FinancialMetrics {
    /// Create metrics stamped with the current time
    pub fn new(pe_ratio: f64, pb_ratio: f64, debt_to_equity: f64) -> Self {
        Self {
            pe_ratio,
            pb_ratio,
            debt_to_equity,
            metrics_updated_at: Some(Utc::now()),
        }
    }
}

// =============================================================================
// Sector
// =============================================================================

/// Industry sector a company belongs to
///
/// Parsing is total: an unrecognized string becomes `Unknown` with the
/// original text preserved, so round-trips are exact and data-entry errors
/// stay visible instead of collapsing into a fixed default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sector {
    /// Technology
    Technology,
    /// Healthcare
    Healthcare,
    /// Financials
    Financials,
    /// Consumer Discretionary
    ConsumerDiscretionary,
    /// Consumer Staples
    ConsumerStaples,
    /// Industrials
    Industrials,
    /// Energy
    Energy,
    /// Utilities
    Utilities,
    /// Real Estate
    RealEstate,
    /// Materials
    Materials,
    /// Telecommunication Services
    TelecommunicationServices,
    /// Unrecognized sector label, original string preserved
    Unknown(String),
}

impl Sector {
    /// Parse a sector from its display label
    pub fn parse(s: &str) -> Sector {
        match s {
            "Technology" => Sector::Technology,
            "Healthcare" => Sector::Healthcare,
            "Financials" => Sector::Financials,
            "Consumer Discretionary" => Sector::ConsumerDiscretionary,
            "Consumer Staples" => Sector::ConsumerStaples,
            "Industrials" => Sector::Industrials,
            "Energy" => Sector::Energy,
            "Utilities" => Sector::Utilities,
            "Real Estate" => Sector::RealEstate,
            "Materials" => Sector::Materials,
            "Telecommunication Services" => Sector::TelecommunicationServices,
            other => Sector::Unknown(other.to_string()),
        }
    }

    /// Display label for this sector
    pub fn as_str(&self) -> &str {
        match self {
            Sector::Technology => "Technology",
            Sector::Healthcare => "Healthcare",
            Sector::Financials => "Financials",
            Sector::ConsumerDiscretionary => "Consumer Discretionary",
            Sector::ConsumerStaples => "Consumer Staples",
            Sector::Industrials => "Industrials",
            Sector::Energy => "Energy",
            Sector::Utilities => "Utilities",
            Sector::RealEstate => "Real Estate",
            Sector::Materials => "Materials",
            Sector::TelecommunicationServices => "Telecommunication Services",
            Sector::Unknown(original) => original,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Sector {
    fn from(s: String) -> Self {
        Sector::parse(&s)
    }
}

impl From<Sector> for String {
    fn from(sector: Sector) -> Self {
        sector.as_str().to_string()
    }
}

// =============================================================================
// RiskProfile
// =============================================================================

/// Investor's tolerance for risk
///
/// Same explicit-unknown policy as [`Sector`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskProfile {
    /// Capital preservation first
    Conservative,
    /// Balanced growth and preservation
    Moderate,
    /// Growth first
    Aggressive,
    /// Unrecognized profile label, original string preserved
    Unknown(String),
}

impl RiskProfile {
    /// Parse a risk profile from its display label
    pub fn parse(s: &str) -> RiskProfile {
        match s {
            "Conservative" => RiskProfile::Conservative,
            "Moderate" => RiskProfile::Moderate,
            "Aggressive" => RiskProfile::Aggressive,
            other => RiskProfile::Unknown(other.to_string()),
        }
    }

    /// Display label for this profile
    pub fn as_str(&self) -> &str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Aggressive => "Aggressive",
            RiskProfile::Unknown(original) => original,
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for RiskProfile {
    fn from(s: String) -> Self {
        RiskProfile::parse(&s)
    }
}

impl From<RiskProfile> for String {
    fn from(profile: RiskProfile) -> Self {
        profile.as_str().to_string()
    }
}

// =============================================================================
// Position
// =============================================================================

/// A holding of a specific company's stock within a portfolio
///
/// # Invariants
/// - Ticker must be non-empty
/// - Share count must be positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Stock ticker of the held company
    pub company_ticker: String,
    /// Number of shares held
    pub shares: u32,
    /// Average purchase price per share
    pub purchase_price: Money,
}

impl Position {
    /// Create a new Position with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidTicker` if the ticker is empty and
    /// `DomainError::InvalidShares` if the share count is zero
    pub fn new(
        ticker: impl Into<String>,
        shares: u32,
        purchase_price: Money,
    ) -> Result<Self, DomainError> {
        let ticker = ticker.into();
        if ticker.is_empty() {
            return Err(DomainError::InvalidTicker(
                "company ticker cannot be empty".to_string(),
            ));
        }
        if shares == 0 {
            return Err(DomainError::InvalidShares(
                "shares must be positive".to_string(),
            ));
        }
        Ok(Self {
            company_ticker: ticker,
            shares,
            purchase_price,
        })
    }

    /// Total cost basis of this holding (purchase price × shares)
    ///
    /// # Errors
    /// Returns `DomainError::Overflow` if the product leaves the `i64` range
    pub fn cost_basis(&self) -> Result<Money, DomainError> {
        self.purchase_price.multiply(i64::from(self.shares))
    }
}

// =============================================================================
// Tests
// =============================================================================
