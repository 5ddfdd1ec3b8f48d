//! Folio Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains aggregates, value objects, and pluggable valuation strategies.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod company;
pub mod portfolio;
pub mod scoring;
pub mod value_objects;

// Re-export commonly used types
pub use company::Company;
pub use portfolio::Portfolio;
pub use scoring::{EqualWeightPlanner, RatioDecayModel, RebalancePlanner, ScoreModel, MAX_SCORE};
pub use value_objects::{
    DomainError, FinancialMetrics, Money, Position, RiskProfile, Sector,
};
