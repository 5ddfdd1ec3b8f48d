//! HTTP API for the folio daemon.
//!
//! Provides REST endpoints for:
//! - Health check
//! - Company lookup, creation, metrics updates, refresh, score search
//! - Portfolio lifecycle, position trades, risk profile, rebalancing
//!
//! Money crosses the wire as integer minor units plus a currency code; no
//! floating-point amounts are accepted or produced.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use folio_app::{
    CompanyService, PortfolioService, RebalanceRecommendation, ServiceError,
};
use folio_domain::{
    Company, FinancialMetrics, Money, Portfolio, RiskProfile, Sector,
};
use folio_store::StoreError;

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
pub struct ApiState {
    pub companies: CompanyService,
    pub portfolios: PortfolioService,
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Company representation returned by the API.
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub ticker: String,
    pub sector: String,
    pub current_score: f64,
    pub pe_ratio: f64,
    pub pb_ratio: f64,
    pub debt_to_equity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_updated_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Company score-search response.
#[derive(Debug, Serialize)]
pub struct CompanySearchResponse {
    pub count: usize,
    pub companies: Vec<CompanyResponse>,
}

/// One holding inside a portfolio response.
#[derive(Debug, Serialize)]
pub struct HoldingResponse {
    pub ticker: String,
    pub shares: u32,
    pub purchase_price: MoneyBody,
}

/// Portfolio representation returned by the API.
#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub id: String,
    pub risk_profile: String,
    pub cash_balance: MoneyBody,
    pub holdings: Vec<HoldingResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_rebalance_time: Option<DateTime<Utc>>,
    pub rebalance_due: bool,
    pub updated_at: DateTime<Utc>,
}

/// Portfolio list response.
#[derive(Debug, Serialize)]
pub struct PortfolioListResponse {
    pub count: usize,
    pub portfolios: Vec<PortfolioResponse>,
}

/// Sector-search response; may be partial when holdings cannot be resolved.
#[derive(Debug, Serialize)]
pub struct SectorSearchResponse {
    pub count: usize,
    pub portfolios: Vec<PortfolioResponse>,
    pub skipped_tickers: Vec<String>,
}

/// Monetary amount on the wire: integer minor units plus currency code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyBody {
    pub amount: i64,
    pub currency: String,
}

impl MoneyBody {
    fn into_money(self) -> Result<Money, (StatusCode, Json<ErrorResponse>)> {
        Money::new(self.amount, self.currency).map_err(|e| bad_request(format!("Invalid money: {}", e)))
    }
}

impl From<&Money> for MoneyBody {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.amount,
            currency: money.currency.clone(),
        }
    }
}

/// Request to create a company.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub ticker: String,
    pub sector: String,
    pub pe_ratio: f64,
    pub pb_ratio: f64,
    pub debt_to_equity: f64,
}

/// Request to replace a company's financial metrics.
#[derive(Debug, Deserialize)]
pub struct UpdateMetricsRequest {
    pub ticker: String,
    pub pe_ratio: f64,
    pub pb_ratio: f64,
    pub debt_to_equity: f64,
}

/// Request to refresh a company's stale metrics.
#[derive(Debug, Deserialize)]
pub struct RefreshCompanyRequest {
    pub ticker: String,
}

/// Request to create a portfolio.
#[derive(Debug, Deserialize)]
pub struct CreatePortfolioRequest {
    pub risk_profile: String,
    pub cash_balance: MoneyBody,
}

/// Request to buy or sell shares.
#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub portfolio_id: String,
    pub ticker: String,
    pub shares: u32,
    pub price_per_share: MoneyBody,
}

/// Request to overwrite a holding's share count.
#[derive(Debug, Deserialize)]
pub struct AdjustPositionRequest {
    pub portfolio_id: String,
    pub ticker: String,
    pub shares: u32,
}

/// Request to change a portfolio's risk profile.
#[derive(Debug, Deserialize)]
pub struct UpdateRiskRequest {
    pub portfolio_id: String,
    pub risk_profile: String,
}

/// Request to record an executed rebalance.
#[derive(Debug, Deserialize)]
pub struct ExecuteRebalanceRequest {
    pub portfolio_id: String,
    pub recommendation: RebalanceRecommendation,
}

/// Ticker query parameter.
#[derive(Debug, Deserialize)]
pub struct TickerQuery {
    pub ticker: String,
}

/// Portfolio id query parameter.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: String,
}

/// Score range query parameters.
#[derive(Debug, Deserialize)]
pub struct ScoreRangeQuery {
    pub min_score: f64,
    pub max_score: f64,
}

/// Portfolio search query: exactly one of the two criteria.
#[derive(Debug, Deserialize)]
pub struct PortfolioSearchQuery {
    pub risk_profile: Option<String>,
    pub sector: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/company", get(get_company_handler))
        .route("/company", delete(delete_company_handler))
        .route("/company/create", post(create_company_handler))
        .route("/company/metrics", put(update_metrics_handler))
        .route("/company/refresh", post(refresh_company_handler))
        .route("/companies/search", get(search_companies_handler))
        .route("/portfolio", get(get_portfolio_handler))
        .route("/portfolio", delete(delete_portfolio_handler))
        .route("/portfolio/create", post(create_portfolio_handler))
        .route("/portfolios", get(list_portfolios_handler))
        .route("/portfolios/search", get(search_portfolios_handler))
        .route("/portfolio/positions", post(add_position_handler))
        .route("/portfolio/positions", put(adjust_position_handler))
        .route("/portfolio/positions/remove", post(remove_position_handler))
        .route("/portfolio/risk", put(update_risk_handler))
        .route("/portfolio/rebalance", get(recommend_rebalance_handler))
        .route("/portfolio/rebalance", post(execute_rebalance_handler))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get a company by ticker.
async fn get_company_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TickerQuery>,
) -> Result<Json<CompanyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let company = state
        .companies
        .get_company(&query.ticker)
        .await
        .map_err(to_error_response)?;

    Ok(Json(company_to_response(&company)))
}

/// Create a new company.
async fn create_company_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), (StatusCode, Json<ErrorResponse>)> {
    let metrics = FinancialMetrics::new(req.pe_ratio, req.pb_ratio, req.debt_to_equity);
    let sector = Sector::parse(&req.sector);

    let company = state
        .companies
        .create_company(&req.ticker, metrics, sector)
        .await
        .map_err(to_error_response)?;

    Ok((StatusCode::CREATED, Json(company_to_response(&company))))
}

/// Replace a company's financial metrics.
async fn update_metrics_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<UpdateMetricsRequest>,
) -> Result<Json<CompanyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let metrics = FinancialMetrics::new(req.pe_ratio, req.pb_ratio, req.debt_to_equity);

    let company = state
        .companies
        .update_metrics(&req.ticker, metrics)
        .await
        .map_err(to_error_response)?;

    Ok(Json(company_to_response(&company)))
}

/// Refresh a company's metrics if stale.
async fn refresh_company_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<RefreshCompanyRequest>,
) -> Result<Json<CompanyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let company = state
        .companies
        .refresh_company(&req.ticker)
        .await
        .map_err(to_error_response)?;

    Ok(Json(company_to_response(&company)))
}

/// Delete a company.
async fn delete_company_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TickerQuery>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .companies
        .delete_company(&query.ticker)
        .await
        .map_err(to_error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Search companies by score range (inclusive).
async fn search_companies_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ScoreRangeQuery>,
) -> Result<Json<CompanySearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let companies = state
        .companies
        .search_by_score(query.min_score, query.max_score)
        .await
        .map_err(to_error_response)?;

    let companies: Vec<CompanyResponse> = companies.iter().map(company_to_response).collect();

    Ok(Json(CompanySearchResponse {
        count: companies.len(),
        companies,
    }))
}

/// Get a portfolio by id.
async fn get_portfolio_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<PortfolioResponse>, (StatusCode, Json<ErrorResponse>)> {
    let portfolio = state
        .portfolios
        .get_portfolio(&query.id)
        .await
        .map_err(to_error_response)?;

    Ok(Json(portfolio_to_response(&portfolio)))
}

/// Create a new portfolio.
async fn create_portfolio_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<CreatePortfolioRequest>,
) -> Result<(StatusCode, Json<PortfolioResponse>), (StatusCode, Json<ErrorResponse>)> {
    let initial_cash = req.cash_balance.into_money()?;
    let risk_profile = RiskProfile::parse(&req.risk_profile);

    let portfolio = state
        .portfolios
        .create_portfolio(risk_profile, initial_cash)
        .await
        .map_err(to_error_response)?;

    Ok((StatusCode::CREATED, Json(portfolio_to_response(&portfolio))))
}

/// List all portfolios.
async fn list_portfolios_handler(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<PortfolioListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let portfolios = state
        .portfolios
        .list_portfolios()
        .await
        .map_err(to_error_response)?;

    let portfolios: Vec<PortfolioResponse> =
        portfolios.iter().map(portfolio_to_response).collect();

    Ok(Json(PortfolioListResponse {
        count: portfolios.len(),
        portfolios,
    }))
}

/// Search portfolios by risk profile or by held sector.
async fn search_portfolios_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PortfolioSearchQuery>,
) -> Result<Json<SectorSearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    match (query.risk_profile, query.sector) {
        (Some(profile), None) => {
            let profile = RiskProfile::parse(&profile);
            let portfolios = state
                .portfolios
                .search_by_risk_profile(&profile)
                .await
                .map_err(to_error_response)?;
            let portfolios: Vec<PortfolioResponse> =
                portfolios.iter().map(portfolio_to_response).collect();

            Ok(Json(SectorSearchResponse {
                count: portfolios.len(),
                portfolios,
                skipped_tickers: vec![],
            }))
        }
        (None, Some(sector)) => {
            let sector = Sector::parse(&sector);
            let result = state
                .portfolios
                .search_by_sector(&sector)
                .await
                .map_err(to_error_response)?;
            let portfolios: Vec<PortfolioResponse> =
                result.portfolios.iter().map(portfolio_to_response).collect();

            Ok(Json(SectorSearchResponse {
                count: portfolios.len(),
                portfolios,
                skipped_tickers: result.skipped_tickers,
            }))
        }
        _ => Err(bad_request(
            "Expected exactly one of: risk_profile, sector".to_string(),
        )),
    }
}

/// Buy shares into a portfolio.
async fn add_position_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<TradeRequest>,
) -> Result<Json<PortfolioResponse>, (StatusCode, Json<ErrorResponse>)> {
    let price = req.price_per_share.into_money()?;

    let portfolio = state
        .portfolios
        .add_position(&req.portfolio_id, &req.ticker, req.shares, price)
        .await
        .map_err(to_error_response)?;

    Ok(Json(portfolio_to_response(&portfolio)))
}

/// Sell shares out of a portfolio.
async fn remove_position_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<TradeRequest>,
) -> Result<Json<PortfolioResponse>, (StatusCode, Json<ErrorResponse>)> {
    let price = req.price_per_share.into_money()?;

    let portfolio = state
        .portfolios
        .remove_position(&req.portfolio_id, &req.ticker, req.shares, price)
        .await
        .map_err(to_error_response)?;

    Ok(Json(portfolio_to_response(&portfolio)))
}

/// Overwrite a holding's share count without moving cash.
async fn adjust_position_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<AdjustPositionRequest>,
) -> Result<Json<PortfolioResponse>, (StatusCode, Json<ErrorResponse>)> {
    let portfolio = state
        .portfolios
        .adjust_position(&req.portfolio_id, &req.ticker, req.shares)
        .await
        .map_err(to_error_response)?;

    Ok(Json(portfolio_to_response(&portfolio)))
}

/// Change a portfolio's risk profile.
async fn update_risk_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<UpdateRiskRequest>,
) -> Result<Json<PortfolioResponse>, (StatusCode, Json<ErrorResponse>)> {
    let profile = RiskProfile::parse(&req.risk_profile);

    let portfolio = state
        .portfolios
        .update_risk_profile(&req.portfolio_id, profile)
        .await
        .map_err(to_error_response)?;

    Ok(Json(portfolio_to_response(&portfolio)))
}

/// Generate rebalance recommendations for a due portfolio.
async fn recommend_rebalance_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<RebalanceRecommendation>, (StatusCode, Json<ErrorResponse>)> {
    let recommendation = state
        .portfolios
        .recommend_rebalance(&query.id)
        .await
        .map_err(to_error_response)?;

    Ok(Json(recommendation))
}

/// Record that a recommendation has been executed.
async fn execute_rebalance_handler(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<ExecuteRebalanceRequest>,
) -> Result<Json<PortfolioResponse>, (StatusCode, Json<ErrorResponse>)> {
    let portfolio = state
        .portfolios
        .execute_rebalance(&req.portfolio_id, &req.recommendation)
        .await
        .map_err(to_error_response)?;

    Ok(Json(portfolio_to_response(&portfolio)))
}

/// Delete a portfolio.
async fn delete_portfolio_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .portfolios
        .delete_portfolio(&query.id)
        .await
        .map_err(to_error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Conversions
// =============================================================================

fn company_to_response(company: &Company) -> CompanyResponse {
    CompanyResponse {
        ticker: company.ticker.clone(),
        sector: company.sector.as_str().to_string(),
        current_score: company.current_score,
        pe_ratio: company.financial_metrics.pe_ratio,
        pb_ratio: company.financial_metrics.pb_ratio,
        debt_to_equity: company.financial_metrics.debt_to_equity,
        metrics_updated_at: company.financial_metrics.metrics_updated_at,
        updated_at: company.updated_at,
    }
}

fn portfolio_to_response(portfolio: &Portfolio) -> PortfolioResponse {
    // Sorted for stable output; HashMap order is arbitrary.
    let mut holdings: Vec<HoldingResponse> = portfolio
        .holdings
        .values()
        .map(|position| HoldingResponse {
            ticker: position.company_ticker.clone(),
            shares: position.shares,
            purchase_price: MoneyBody::from(&position.purchase_price),
        })
        .collect();
    holdings.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    PortfolioResponse {
        id: portfolio.id.clone(),
        risk_profile: portfolio.risk_profile.as_str().to_string(),
        cash_balance: MoneyBody::from(&portfolio.cash_balance),
        holdings,
        last_rebalance_time: portfolio.last_rebalance_time,
        rebalance_due: portfolio.rebalance_due(),
        updated_at: portfolio.updated_at,
    }
}

/// Map a service error to an HTTP status and error body.
///
/// The mapping is typed on the error variants; no message inspection.
/// Malformed input is 400; violations of state-dependent rules are 422.
fn to_error_response(err: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    use folio_domain::DomainError;

    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::AlreadyExists { .. } => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::InvalidRange { .. }) => StatusCode::BAD_REQUEST,
        ServiceError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        ServiceError::Domain(
            DomainError::InvalidCurrency(_)
            | DomainError::InvalidTicker(_)
            | DomainError::InvalidShares(_)
            | DomainError::InvalidPortfolioId(_)
            | DomainError::NegativeCash(_),
        ) => StatusCode::BAD_REQUEST,
        ServiceError::Domain(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn bad_request(message: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

// =============================================================================
// Tests
// =============================================================================
