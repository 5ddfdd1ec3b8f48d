//! Folio Storage Layer
//!
//! Provides persistence for the Company and Portfolio aggregates.
//!
//! # Architecture
//!
//! - **Repository traits**: Define the storage interface (ports), one per
//!   aggregate root
//! - **In-memory stores**: lock-guarded maps for development and testing;
//!   state lives in process memory and is lost on restart
//!
//! # Usage
//!
//! ```rust
//! use folio_store::{CompanyRepository, MemoryCompanyRepository};
//! use folio_domain::{Company, FinancialMetrics, Sector};
//!
//! #[tokio::main]
//! async fn main() {
//!     let repo = MemoryCompanyRepository::new();
//!
//!     let company = Company::new(
//!         "AAPL",
//!         FinancialMetrics::new(15.0, 1.5, 0.8),
//!         Sector::Technology,
//!     )
//!     .unwrap();
//!     repo.save(&company).await.unwrap();
//!
//!     let found = repo.find_by_ticker("AAPL").await.unwrap();
//!     println!("Score: {}", found.current_score);
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod memory;
mod repository;

// Re-exports
pub use error::StoreError;
pub use memory::{MemoryCompanyRepository, MemoryPortfolioRepository};
pub use repository::{CompanyRepository, PortfolioRepository, SectorSearch};
