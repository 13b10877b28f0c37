use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{BottleCounts, CustomerTier, SaleId, Transaction};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub customer_type: i64,
    #[serde(default)]
    pub large_qty: u32,
    #[serde(default)]
    pub medium_qty: u32,
    #[serde(default)]
    pub small_qty: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub datetime: String,
    pub customer_type: i64,
    pub large_qty: u32,
    pub medium_qty: u32,
    pub small_qty: u32,
    pub total_price: String,
    pub total_gas: String,
}

impl From<&Transaction> for SaleDto {
    fn from(tx: &Transaction) -> Self {
        SaleDto {
            id: tx.id.as_str().to_string(),
            datetime: tx.datetime_str(),
            customer_type: tx.customer_tier.as_i64(),
            large_qty: tx.counts.large,
            medium_qty: tx.counts.medium,
            small_qty: tx.counts.small,
            total_price: tx.total_price.to_canonical_string(),
            total_gas: tx.total_gas.to_canonical_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesResponse {
    pub date: String,
    pub sales: Vec<SaleDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDayResponse {
    pub date: String,
    pub removed: u64,
}

/// POST /v1/sales: price and record a sale; totals come from the
/// tariff, never from the client.
pub async fn create_sale(
    State(state): State<AppState>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleDto>), AppError> {
    let tier = CustomerTier::try_from(req.customer_type)?;
    let counts = BottleCounts::new(req.large_qty, req.medium_qty, req.small_qty);

    let tx = state
        .ledger
        .record_sale(tier, counts, state.clock.now())
        .await?;
    Ok((StatusCode::CREATED, Json(SaleDto::from(&tx))))
}

/// GET /v1/sales?date=YYYY-MM-DD: list a date's sales (default today).
pub async fn get_sales(
    Query(params): Query<SalesQuery>,
    State(state): State<AppState>,
) -> Result<Json<SalesResponse>, AppError> {
    let date = super::parse_date_or_today(params.date.as_deref(), state.clock.as_ref())?;
    let sales = state.ledger.sales_on(date).await?;
    Ok(Json(SalesResponse {
        date: date.to_string(),
        sales: sales.iter().map(SaleDto::from).collect(),
    }))
}

/// GET /v1/sales/:id: fetch one sale from the active store.
pub async fn get_sale(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SaleDto>, AppError> {
    let id = SaleId::new(id);
    let tx = state
        .ledger
        .sale(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no transaction with id {}", id)))?;
    Ok(Json(SaleDto::from(&tx)))
}

/// DELETE /v1/sales/:id: remove one sale from the active store.
pub async fn delete_sale(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.ledger.delete_sale(&SaleId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/sales?date=YYYY-MM-DD: remove a date's sales from the
/// active store (default today), reporting how many went away.
pub async fn delete_sales(
    Query(params): Query<SalesQuery>,
    State(state): State<AppState>,
) -> Result<Json<DeleteDayResponse>, AppError> {
    let date = super::parse_date_or_today(params.date.as_deref(), state.clock.as_ref())?;
    let removed = state.ledger.delete_day(date).await?;
    Ok(Json(DeleteDayResponse {
        date: date.to_string(),
        removed,
    }))
}
