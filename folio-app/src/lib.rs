//! Application services for the folio portfolio tracker
//!
//! Thin orchestration over the domain aggregates in `folio-domain` and the
//! repositories in `folio-store`. Services own no state of their own; all
//! persistence goes through the injected repository ports, so any backend
//! implementing those traits can sit underneath.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod company_service;
pub mod error;
pub mod portfolio_service;

pub use company_service::CompanyService;
pub use error::{ServiceError, ServiceResult};
pub use portfolio_service::{PortfolioService, RebalanceRecommendation};
