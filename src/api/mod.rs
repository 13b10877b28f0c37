pub mod health;
pub mod sales;
pub mod summary;

use crate::clock::Clock;
use crate::domain::SaleDate;
use crate::error::AppError;
use crate::ledger::Ledger;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(ledger: Arc<Ledger>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/sales",
            post(sales::create_sale)
                .get(sales::get_sales)
                .delete(sales::delete_sales),
        )
        .route(
            "/v1/sales/:id",
            get(sales::get_sale).delete(sales::delete_sale),
        )
        .route("/v1/summary", get(summary::get_summary))
        .route("/v1/summary/daily", get(summary::get_daily_summaries))
        .layer(cors)
        .with_state(state)
}

/// Resolve an optional `?date=YYYY-MM-DD` parameter, defaulting to the
/// clock's current date.
pub(crate) fn parse_date_or_today(
    raw: Option<&str>,
    clock: &dyn Clock,
) -> Result<SaleDate, AppError> {
    match raw {
        None | Some("") => Ok(SaleDate::new(clock.now().date())),
        Some(s) => SaleDate::parse(s)
            .map_err(|_| AppError::BadRequest(format!("Invalid date: {}", s))),
    }
}
